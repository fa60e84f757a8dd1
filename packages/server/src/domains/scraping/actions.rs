//! Starting and refreshing report scrapes.
//!
//! Actions only touch the database and enqueue jobs; the scraping itself runs
//! in [`super::jobs::ReportJobHandler`].

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::common::utils::{is_valid_email, normalize_business_url, normalize_email};
use crate::common::{CompanyId, ReportId};
use crate::domains::companies::Company;
use crate::domains::reports::{detect_source_from_url, VocReport};
use crate::kernel::{Job, ServerDeps};

pub const QUEUED_MESSAGE: &str = "Report queued";

/// Platforms the scraping pipeline knows how to collect from.
pub const SUPPORTED_SOURCES: &[&str] = &[
    "trustpilot",
    "google",
    "yelp",
    "tripadvisor",
    "facebook",
    "g2",
    "capterra",
    "amazon",
    "app_store",
    "google_play",
    "booking",
    "glassdoor",
    "reddit",
    "bbb",
];

#[derive(Debug, Clone, Deserialize)]
pub struct StartReportRequest {
    #[serde(alias = "businessName")]
    pub business_name: String,
    #[serde(alias = "businessUrl", alias = "url")]
    pub business_url: String,
    pub email: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

pub enum StartReportResult {
    Started {
        report_id: ReportId,
        company_id: CompanyId,
        status: String,
    },
    Invalid(String),
    Blocked,
}

pub enum ActivateSourcesResult {
    Activated(VocReport),
    Invalid(String),
    NotFound,
}

/// Known platform names from `requested` plus the platform of `url` itself.
pub fn initial_sources(url: &str, requested: &[String]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    let from_url = detect_source_from_url(url).map(str::to_string);

    for source in requested
        .iter()
        .map(|s| s.trim().to_lowercase())
        .chain(from_url)
    {
        if SUPPORTED_SOURCES.contains(&source.as_str()) && !sources.contains(&source) {
            sources.push(source);
        }
    }
    sources
}

/// Validate the submission, record company + report and queue the scrape.
pub async fn start_report(
    request: StartReportRequest,
    ip_address: Option<&str>,
    deps: &ServerDeps,
) -> Result<StartReportResult> {
    let business_name = request.business_name.trim();
    if business_name.is_empty() {
        return Ok(StartReportResult::Invalid("Business name is required".into()));
    }

    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Ok(StartReportResult::Invalid("A valid email is required".into()));
    }

    let business_url = match normalize_business_url(&request.business_url) {
        Ok(url) => url,
        Err(e) => return Ok(StartReportResult::Invalid(e.to_string())),
    };

    let company =
        Company::find_or_create(business_name, &email, &business_url, ip_address, &deps.db_pool)
            .await?;
    if company.is_blocked() {
        info!(company_id = %company.id, "Blocked company tried to start a report");
        return Ok(StartReportResult::Blocked);
    }

    let sources = initial_sources(&business_url, &request.sources);
    let report = VocReport::create(
        company.id,
        business_name,
        &business_url,
        &sources,
        QUEUED_MESSAGE,
        &deps.db_pool,
    )
    .await?;

    deps.jobs
        .enqueue(Job::ProcessReport {
            report_id: report.id,
            company_id: company.id,
        })
        .await?;

    info!(
        report_id = %report.id,
        company_id = %company.id,
        sources = ?sources,
        "Report started"
    );

    Ok(StartReportResult::Started {
        report_id: report.id,
        company_id: company.id,
        status: report.status,
    })
}

/// Queue a sync for an existing report. Returns `false` if it does not exist.
pub async fn request_sync(report_id: ReportId, deps: &ServerDeps) -> Result<bool> {
    if VocReport::find_by_id(report_id, &deps.db_pool).await?.is_none() {
        return Ok(false);
    }
    deps.jobs.enqueue(Job::SyncReport { report_id }).await?;
    info!(report_id = %report_id, "Sync requested");
    Ok(true)
}

/// Move detected sources into the active set and queue a sync to scrape them.
pub async fn activate_sources(
    report_id: ReportId,
    sources: Vec<String>,
    deps: &ServerDeps,
) -> Result<ActivateSourcesResult> {
    let sources: Vec<String> = sources
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if sources.is_empty() {
        return Ok(ActivateSourcesResult::Invalid("sources must not be empty".into()));
    }
    if let Some(unknown) = sources
        .iter()
        .find(|s| !SUPPORTED_SOURCES.contains(&s.as_str()))
    {
        return Ok(ActivateSourcesResult::Invalid(format!(
            "Unsupported source: {}",
            unknown
        )));
    }

    if VocReport::find_by_id(report_id, &deps.db_pool).await?.is_none() {
        return Ok(ActivateSourcesResult::NotFound);
    }

    let report = VocReport::activate_sources(report_id, &sources, &deps.db_pool).await?;
    deps.jobs.enqueue(Job::SyncReport { report_id }).await?;

    info!(report_id = %report_id, sources = ?report.sources, "Sources activated");
    Ok(ActivateSourcesResult::Activated(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_sources_merge_request_and_url() {
        let requested = vec!["Yelp".to_string(), "myspace".to_string(), "yelp".to_string()];
        assert_eq!(
            initial_sources("https://www.trustpilot.com/review/acme.com", &requested),
            vec!["yelp", "trustpilot"]
        );
    }

    #[test]
    fn plain_site_without_request_has_no_sources() {
        assert!(initial_sources("https://acme.com", &[]).is_empty());
    }
}
