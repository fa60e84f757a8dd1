use axum::{
    async_trait,
    extract::{Extension, FromRequestParts, Request},
    http::{header::COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domains::auth::actions::user_for_token;
use crate::domains::auth::{parse_cookie, UserProfile, SESSION_COOKIE};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Authenticated user resolved from the session cookie
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub profile: UserProfile,
}

/// Session token from the request's Cookie header.
pub fn session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| parse_cookie(header, SESSION_COOKIE))
        .map(str::to_string)
}

/// Middleware to resolve the session cookie and populate [`AuthUser`]
///
/// This middleware does NOT block requests - it only extracts auth info.
/// Handlers that need a user take `AuthUser` as an extractor.
pub async fn session_auth_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        match user_for_token(&token, &state.deps).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(AuthUser {
                    profile: UserProfile::from(&user),
                });
            }
            Ok(None) => tracing::debug!("Session cookie without a live session"),
            Err(e) => tracing::warn!(error = %e, "Session lookup failed"),
        }
    }

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}
