use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::{PageParams, ReportId};
use crate::domains::reports::actions::{report_detail, report_reviews, report_status};
use crate::domains::reports::{ReportDetail, ReportStatusView, ReviewPage};
use crate::domains::scraping::{activate_sources, request_sync, ActivateSourcesResult};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ReportStatusQuery {
    #[serde(alias = "reportId")]
    pub report_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivateSourcesRequest {
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub success: bool,
    pub report_id: ReportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

fn parse_report_id(raw: &str) -> ApiResult<ReportId> {
    ReportId::parse(raw).map_err(|_| ApiError::BadRequest(format!("Invalid report id: {}", raw)))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Report not found".to_string())
}

/// GET /api/report-status?report_id=
pub async fn report_status_handler(
    Extension(state): Extension<AppState>,
    query: Result<Query<ReportStatusQuery>, QueryRejection>,
) -> ApiResult<Json<ReportStatusView>> {
    let Query(query) = query?;
    let raw = query
        .report_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("report_id is required".to_string()))?;
    let report_id = parse_report_id(&raw)?;

    report_status(report_id, &state.deps)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// GET /api/reports/:id
pub async fn report_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReportDetail>> {
    let report_id = parse_report_id(&id)?;
    report_detail(report_id, &state.deps)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// GET /api/reports/:id/reviews?limit=&offset=
pub async fn report_reviews_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<ReviewPage>> {
    let report_id = parse_report_id(&id)?;
    let Query(params) = params?;

    report_reviews(report_id, params.page(), &state.deps)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// POST /api/reports/:id/sync
pub async fn sync_report_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<QueuedResponse>> {
    let report_id = parse_report_id(&id)?;
    if !request_sync(report_id, &state.deps).await? {
        return Err(not_found());
    }
    Ok(Json(QueuedResponse {
        success: true,
        report_id,
        sources: None,
    }))
}

/// POST /api/reports/:id/sources
pub async fn activate_sources_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ActivateSourcesRequest>, JsonRejection>,
) -> ApiResult<Json<QueuedResponse>> {
    let report_id = parse_report_id(&id)?;
    let Json(request) = payload?;

    match activate_sources(report_id, request.sources, &state.deps).await? {
        ActivateSourcesResult::Activated(report) => Ok(Json(QueuedResponse {
            success: true,
            report_id,
            sources: Some(report.sources),
        })),
        ActivateSourcesResult::Invalid(reason) => Err(ApiError::BadRequest(reason)),
        ActivateSourcesResult::NotFound => Err(not_found()),
    }
}
