//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::analysis::TopicClassifier;
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::{extract_client_ip, session_auth_middleware, with_rate_limit};
use crate::server::routes::{
    activate_sources_handler, analyze_reviews_handler, classify_topic_handler, health_handler,
    login_handler, logout_handler, me_handler, report_handler, report_reviews_handler,
    report_status_handler, scrape_handler, send_email_handler, signup_handler,
    sync_report_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub classifier: TopicClassifier,
}

impl AppState {
    pub fn new(deps: ServerDeps) -> Self {
        let classifier = TopicClassifier::new(deps.ai.clone());
        Self {
            deps: Arc::new(deps),
            classifier,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(tower_http::cors::Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    // Cookies only travel cross-origin to explicitly listed origins
    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, config: &Config) -> Result<Router> {
    let state = AppState::new(deps);

    let mut api = Router::new()
        .route("/api/scrape", post(scrape_handler))
        .route("/api/report-status", get(report_status_handler))
        .route("/api/reports/:id", get(report_handler))
        .route("/api/reports/:id/reviews", get(report_reviews_handler))
        .route("/api/reports/:id/sync", post(sync_report_handler))
        .route("/api/reports/:id/sources", post(activate_sources_handler))
        .route("/api/analyze-reviews", post(analyze_reviews_handler))
        .route("/api/classify-topic", post(classify_topic_handler))
        .route("/api/send-email", post(send_email_handler))
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler));

    // Health checks stay outside the limiter
    if config.rate_limit_enabled {
        api = with_rate_limit(api)?;
    }

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .fallback(|| async { ApiError::NotFound("Not found".to_string()) })
        .layer(middleware::from_fn(session_auth_middleware));

    let app = router
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(state)) // Add shared state (must be after middlewares that need it)
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
