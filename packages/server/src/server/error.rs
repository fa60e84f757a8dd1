//! HTTP error type. Every failure is rendered as
//! `{"error": "...", "details": "..."}` with a matching status code.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::kernel::{EdgeFunctionError, MissingConfig};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A required environment variable is missing
    #[error("server misconfigured: {0}")]
    Config(String),
    /// An external service (Edge Function, e-mail provider) failed
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg.clone(), None),
            ApiError::Config(detail) => ("Server configuration error".to_string(), Some(detail.clone())),
            ApiError::Upstream(detail) => ("Upstream service error".to_string(), Some(detail.clone())),
            ApiError::Internal(err) => ("Internal server error".to_string(), Some(err.to_string())),
        };
        ErrorBody { error, details }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(missing) = cause.downcast_ref::<MissingConfig>() {
                return ApiError::Config(missing.to_string());
            }
            if cause.downcast_ref::<EdgeFunctionError>().is_some()
                || cause.downcast_ref::<resend::ResendError>().is_some()
            {
                return ApiError::Upstream(format!("{:#}", err));
            }
        }
        ApiError::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(err) => tracing::error!(error = ?err, "Internal server error"),
            ApiError::Config(detail) => tracing::error!(detail = %detail, "Configuration error"),
            ApiError::Upstream(detail) => tracing::warn!(detail = %detail, "Upstream failure"),
            _ => {}
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::EdgeFunction;

    #[test]
    fn missing_config_maps_to_config_error() {
        let err: anyhow::Error = MissingConfig("RESEND_API_KEY").into();
        let api: ApiError = err.context("sending e-mail").into();

        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = api.body();
        assert_eq!(body.error, "Server configuration error");
        assert_eq!(body.details.as_deref(), Some("RESEND_API_KEY is not configured"));
    }

    #[test]
    fn edge_function_failure_is_bad_gateway() {
        let err: anyhow::Error = EdgeFunctionError::Status {
            function: EdgeFunction::ProcessVocReport,
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn other_errors_are_internal() {
        let api = ApiError::from(anyhow::anyhow!("db down"));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body().error, "Internal server error");
    }

    #[test]
    fn client_errors_have_no_details() {
        let body = ApiError::NotFound("Report not found".into()).body();
        assert_eq!(body.error, "Report not found");
        assert!(body.details.is_none());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Report not found" })
        );
    }
}
