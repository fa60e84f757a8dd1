use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::Serialize;

use crate::domains::email::{send_email, SendEmailRequest, SendEmailResult};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub id: String,
}

/// POST /api/send-email
pub async fn send_email_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> ApiResult<Json<SendEmailResponse>> {
    let Json(request) = payload?;

    match send_email(request, &state.deps).await? {
        SendEmailResult::Sent { id } => Ok(Json(SendEmailResponse { success: true, id })),
        SendEmailResult::Invalid(reason) => Err(ApiError::BadRequest(reason)),
        SendEmailResult::ReportNotFound => Err(ApiError::NotFound("Report not found".to_string())),
    }
}
