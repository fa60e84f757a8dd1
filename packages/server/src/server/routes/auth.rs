use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::auth::actions::{
    login, logout, signup, IssuedSession, LoginRequest, LoginResult, SignupRequest, SignupResult,
};
use crate::domains::auth::{clear_session_cookie, session_cookie, UserProfile, INVALID_CREDENTIALS};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::{session_token, AuthUser};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

fn with_session(status: StatusCode, session: IssuedSession, ttl_hours: i64) -> Response {
    let cookie = session_cookie(&session.token, ttl_hours);
    (
        status,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(UserResponse {
            success: true,
            user: session.user,
        }),
    )
        .into_response()
}

/// POST /api/auth/signup
pub async fn signup_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    match signup(request, &state.deps).await? {
        SignupResult::Created(session) => Ok(with_session(
            StatusCode::CREATED,
            session,
            state.deps.session_ttl_hours,
        )),
        SignupResult::Invalid(reason) => Err(ApiError::BadRequest(reason)),
        SignupResult::EmailTaken => Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        )),
    }
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    match login(request, &state.deps).await? {
        LoginResult::LoggedIn(session) => Ok(with_session(
            StatusCode::OK,
            session,
            state.deps.session_ttl_hours,
        )),
        LoginResult::InvalidCredentials => {
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}

/// POST /api/auth/logout - always succeeds and clears the cookie
pub async fn logout_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        logout(&token, &state.deps).await?;
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(serde_json::json!({ "success": true })),
    )
        .into_response())
}

/// GET /api/auth/me
pub async fn me_handler(user: AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: user.profile,
    })
}
