use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::Serialize;

use crate::common::{CompanyId, ReportId};
use crate::domains::scraping::{start_report, StartReportRequest, StartReportResult};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::ClientIp;

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub report_id: ReportId,
    pub company_id: CompanyId,
    pub status: String,
}

/// POST /api/scrape - open a report and queue the scrape
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    client_ip: Option<Extension<ClientIp>>,
    payload: Result<Json<StartReportRequest>, JsonRejection>,
) -> ApiResult<Json<ScrapeResponse>> {
    let Json(request) = payload?;
    let ip = client_ip.map(|Extension(ClientIp(ip))| ip.to_string());

    match start_report(request, ip.as_deref(), &state.deps).await? {
        StartReportResult::Started {
            report_id,
            company_id,
            status,
        } => Ok(Json(ScrapeResponse {
            success: true,
            report_id,
            company_id,
            status,
        })),
        StartReportResult::Invalid(reason) => Err(ApiError::BadRequest(reason)),
        StartReportResult::Blocked => Err(ApiError::Forbidden(
            "This company is not allowed to create reports".to_string(),
        )),
    }
}
