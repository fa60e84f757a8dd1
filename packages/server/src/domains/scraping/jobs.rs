//! Background execution of report jobs.
//!
//! ```text
//! ProcessReport ─► "Collecting reviews" ─► process-voc-report ─► AnalyzeReport
//! SyncReport    ─► "Syncing reviews"    ─► sync-voc-report    ─► AnalyzeReport
//! AnalyzeReport ─► stored reviews ─► generate_analysis ─► complete (+ e-mail on first completion)
//! ```
//!
//! Any Edge Function or analysis failure marks the report `error` with the
//! failure text.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::common::ReportId;
use crate::domains::companies::Company;
use crate::domains::email::notify_report_ready;
use crate::domains::reports::actions::analyze_report;
use crate::domains::reports::{detect_sources, VocReport};
use crate::kernel::{EdgeFunction, Job, JobHandler, ServerDeps};

pub const COLLECTING_MESSAGE: &str = "Collecting reviews";
pub const SYNCING_MESSAGE: &str = "Syncing reviews";
pub const ANALYZING_MESSAGE: &str = "Analyzing reviews";

pub struct ReportJobHandler {
    deps: ServerDeps,
}

impl ReportJobHandler {
    pub fn new(deps: ServerDeps) -> Self {
        Self { deps }
    }

    async fn run_edge_function(
        &self,
        report: &VocReport,
        function: EdgeFunction,
        progress: &str,
    ) -> Result<()> {
        let pool = &self.deps.db_pool;
        VocReport::set_progress(report.id, progress, pool).await?;

        let payload = json!({
            "report_id": report.id,
            "company_id": report.company_id,
            "business_name": report.business_name,
            "business_url": report.business_url,
            "sources": report.sources,
        });

        let response = match self.deps.edge_functions() {
            Ok(client) => client.invoke(function, payload).await,
            Err(e) => Err(e),
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(report_id = %report.id, function = %function, error = %e, "Edge function failed");
                VocReport::mark_error(report.id, &e.to_string(), pool).await?;
                return Ok(());
            }
        };

        record_detected_sources(report, &response, &self.deps).await?;
        self.deps
            .jobs
            .enqueue(Job::AnalyzeReport {
                report_id: report.id,
            })
            .await
    }

    async fn analyze(&self, report_id: ReportId) -> Result<()> {
        if let Err(e) = self.analyze_and_notify(report_id).await {
            warn!(report_id = %report_id, error = %e, "Report analysis failed");
            let message = format!("Analysis failed: {}", e);
            VocReport::mark_error(report_id, &message, &self.deps.db_pool).await?;
        }
        Ok(())
    }

    async fn analyze_and_notify(&self, report_id: ReportId) -> Result<()> {
        let pool = &self.deps.db_pool;
        let Some(before) = VocReport::find_by_id(report_id, pool).await? else {
            warn!(report_id = %report_id, "Report vanished before analysis");
            return Ok(());
        };
        VocReport::set_progress(report_id, ANALYZING_MESSAGE, pool).await?;

        let Some((report, _analysis)) = analyze_report(report_id, None, &self.deps).await? else {
            return Ok(());
        };

        if before.completed_at.is_none() {
            if let Some(company) = Company::find_by_id(report.company_id, pool).await? {
                notify_report_ready(&report, &company.email, &self.deps).await;
            }
        }
        Ok(())
    }
}

/// Store review-platform URLs the pipeline found on the business site that
/// are not active yet. The response may carry them as `detected_sources`
/// (platform names) or `detected_urls`.
async fn record_detected_sources(
    report: &VocReport,
    response: &serde_json::Value,
    deps: &ServerDeps,
) -> Result<()> {
    let names = response
        .get("detected_sources")
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_lowercase())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let from_urls = response
        .get("detected_urls")
        .and_then(|v| v.as_array())
        .map(|values| detect_sources(values.iter().filter_map(|v| v.as_str())))
        .unwrap_or_default();

    let mut detected: Vec<String> = Vec::new();
    for source in names.into_iter().chain(from_urls) {
        if !source.is_empty() && !report.sources.contains(&source) && !detected.contains(&source) {
            detected.push(source);
        }
    }

    if detected.is_empty() {
        return Ok(());
    }

    info!(report_id = %report.id, detected = ?detected, "Detected new review sources");
    VocReport::set_detected_sources(report.id, &detected, &deps.db_pool).await
}

#[async_trait]
impl JobHandler for ReportJobHandler {
    async fn handle(&self, job: Job) -> Result<()> {
        let report_id = job.report_id();
        info!(job = job.kind(), report_id = %report_id, "Handling report job");

        if let Job::AnalyzeReport { report_id } = job {
            return self.analyze(report_id).await;
        }

        let Some(report) = VocReport::find_by_id(report_id, &self.deps.db_pool).await? else {
            warn!(report_id = %report_id, "Job for unknown report dropped");
            return Ok(());
        };

        match job {
            Job::ProcessReport { .. } => {
                self.run_edge_function(&report, EdgeFunction::ProcessVocReport, COLLECTING_MESSAGE)
                    .await
            }
            Job::SyncReport { .. } => {
                self.run_edge_function(&report, EdgeFunction::SyncVocReport, SYNCING_MESSAGE)
                    .await
            }
            Job::AnalyzeReport { .. } => Ok(()),
        }
    }
}
