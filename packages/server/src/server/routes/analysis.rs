use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::ReportId;
use crate::domains::analysis::{generate_analysis, ReviewInput, TopicClassification, VocAnalysis};
use crate::domains::reports::actions::{request_analysis, RequestAnalysisResult};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct AnalyzeReviewsRequest {
    #[serde(default)]
    pub reviews: Option<Vec<ReviewInput>>,
    #[serde(default, alias = "reportId")]
    pub report_id: Option<ReportId>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeReviewsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<ReportId>,
    /// Whether the analysis was stored on the report
    pub saved: bool,
    pub analysis: VocAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyTopicRequest {
    pub text: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// POST /api/analyze-reviews
///
/// With `report_id` the result is stored on the report, using the stored
/// reviews when `reviews` is absent, and a report still processing answers
/// 409. Without it the analysis is only returned.
pub async fn analyze_reviews_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<AnalyzeReviewsRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeReviewsResponse>> {
    let Json(request) = payload?;

    match (request.report_id, request.reviews) {
        (Some(report_id), reviews) => {
            let analysis = match request_analysis(report_id, reviews, &state.deps).await? {
                RequestAnalysisResult::Stored(analysis) => analysis,
                RequestAnalysisResult::NotFound => {
                    return Err(ApiError::NotFound("Report not found".to_string()))
                }
                RequestAnalysisResult::StillProcessing => {
                    return Err(ApiError::Conflict(
                        "Report is still being processed".to_string(),
                    ))
                }
            };
            Ok(Json(AnalyzeReviewsResponse {
                success: true,
                report_id: Some(report_id),
                saved: true,
                analysis,
            }))
        }
        (None, Some(reviews)) => Ok(Json(AnalyzeReviewsResponse {
            success: true,
            report_id: None,
            saved: false,
            analysis: generate_analysis(&reviews),
        })),
        (None, None) => Err(ApiError::BadRequest(
            "Either reviews or report_id is required".to_string(),
        )),
    }
}

/// POST /api/classify-topic
pub async fn classify_topic_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ClassifyTopicRequest>, JsonRejection>,
) -> ApiResult<Json<TopicClassification>> {
    let Json(request) = payload?;
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is required".to_string()));
    }

    let result = state
        .classifier
        .classify(&request.text, &request.topics)
        .await;
    Ok(Json(result))
}
