//! Report reads and analysis persistence.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::models::{ReportStatus, Review, VocReport};
use crate::common::{Page, ReportId};
use crate::domains::analysis::{generate_analysis, ReviewInput, VocAnalysis};
use crate::kernel::ServerDeps;

/// Polling view of a report
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportStatusView {
    pub report_id: ReportId,
    pub status: String,
    pub progress_message: Option<String>,
    pub has_analysis: bool,
    pub sources: Vec<String>,
    pub detected_sources: Vec<String>,
    pub error: Option<String>,
}

impl From<&VocReport> for ReportStatusView {
    fn from(report: &VocReport) -> Self {
        Self {
            report_id: report.id,
            status: report.status.clone(),
            progress_message: report.progress_message.clone(),
            has_analysis: report.analysis.is_some(),
            sources: report.sources.clone(),
            detected_sources: report.detected_sources.clone(),
            error: report.error_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: VocReport,
    pub review_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub async fn report_status(report_id: ReportId, deps: &ServerDeps) -> Result<Option<ReportStatusView>> {
    let report = VocReport::find_by_id(report_id, &deps.db_pool).await?;
    Ok(report.as_ref().map(ReportStatusView::from))
}

pub async fn report_detail(report_id: ReportId, deps: &ServerDeps) -> Result<Option<ReportDetail>> {
    let Some(report) = VocReport::find_by_id(report_id, &deps.db_pool).await? else {
        return Ok(None);
    };
    let review_count = Review::count_by_company(report.company_id, &deps.db_pool).await?;
    Ok(Some(ReportDetail {
        report,
        review_count,
    }))
}

pub async fn report_reviews(
    report_id: ReportId,
    page: Page,
    deps: &ServerDeps,
) -> Result<Option<ReviewPage>> {
    let Some(report) = VocReport::find_by_id(report_id, &deps.db_pool).await? else {
        return Ok(None);
    };

    let reviews = Review::find_page_by_company(report.company_id, page, &deps.db_pool).await?;
    let total = Review::count_by_company(report.company_id, &deps.db_pool).await?;
    Ok(Some(ReviewPage {
        reviews,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Analyse a report and store the result on it, marking it complete.
///
/// Uses `reviews` when given, otherwise every review stored for the report's
/// company. Returns `None` when the report does not exist.
pub async fn analyze_report(
    report_id: ReportId,
    reviews: Option<Vec<ReviewInput>>,
    deps: &ServerDeps,
) -> Result<Option<(VocReport, VocAnalysis)>> {
    let Some(report) = VocReport::find_by_id(report_id, &deps.db_pool).await? else {
        return Ok(None);
    };

    let reviews = match reviews {
        Some(reviews) => reviews,
        None => Review::find_by_company(report.company_id, &deps.db_pool)
            .await?
            .iter()
            .map(Review::to_input)
            .collect(),
    };

    let analysis = generate_analysis(&reviews);
    let json = serde_json::to_value(&analysis).context("Failed to serialize analysis")?;
    let report = VocReport::mark_complete(report_id, &json, &deps.db_pool).await?;

    info!(
        report_id = %report_id,
        reviews = analysis.summary.total_reviews,
        "Report analysis stored"
    );
    Ok(Some((report, analysis)))
}

/// Result of an on-demand analysis request
#[derive(Debug)]
pub enum RequestAnalysisResult {
    Stored(VocAnalysis),
    NotFound,
    /// The background pipeline still owns the report
    StillProcessing,
}

/// Analyse a report on request. Reports still in `processing` are left to
/// the background jobs so the first-completion e-mail is not lost.
pub async fn request_analysis(
    report_id: ReportId,
    reviews: Option<Vec<ReviewInput>>,
    deps: &ServerDeps,
) -> Result<RequestAnalysisResult> {
    let Some(report) = VocReport::find_by_id(report_id, &deps.db_pool).await? else {
        return Ok(RequestAnalysisResult::NotFound);
    };
    if report.report_status() == Some(ReportStatus::Processing) {
        return Ok(RequestAnalysisResult::StillProcessing);
    }

    match analyze_report(report_id, reviews, deps).await? {
        Some((_, analysis)) => Ok(RequestAnalysisResult::Stored(analysis)),
        None => Ok(RequestAnalysisResult::NotFound),
    }
}
