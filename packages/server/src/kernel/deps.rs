//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domains.
//! All external services sit behind trait objects so tests can swap in mocks.
//! Optional services stay `None` when their environment is not configured; the
//! accessors turn that into a [`MissingConfig`] error naming the variable.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    BaseAI, BaseEdgeFunctions, BaseEmailService, JobQueue, OpenAIAdapter, ResendAdapter,
    SupabaseEdgeFunctions,
};
use crate::config::Config;

/// A feature was used whose environment variable is not set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0} is not configured")]
pub struct MissingConfig(pub &'static str);

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// LLM for topic classification; keyword-only when absent
    pub ai: Option<Arc<dyn BaseAI>>,
    pub edge_functions: Option<Arc<dyn BaseEdgeFunctions>>,
    pub email: Option<Arc<dyn BaseEmailService>>,
    pub jobs: Arc<dyn JobQueue>,
    pub app_base_url: String,
    pub session_ttl_hours: i64,
    pub sync_stale_after_hours: i64,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, jobs: Arc<dyn JobQueue>) -> Self {
        Self {
            db_pool,
            ai: None,
            edge_functions: None,
            email: None,
            jobs,
            app_base_url: "http://localhost:3000".to_string(),
            session_ttl_hours: 168,
            sync_stale_after_hours: 168,
        }
    }

    /// Wire real service adapters for whatever the config provides.
    pub fn from_config(config: &Config, db_pool: PgPool, jobs: Arc<dyn JobQueue>) -> Result<Self> {
        let ai = config.openai_api_key.clone().map(|key| {
            Arc::new(OpenAIAdapter::new(key, config.openai_model.clone())) as Arc<dyn BaseAI>
        });

        let edge_functions = match (&config.supabase_url, &config.supabase_service_role_key) {
            (Some(url), Some(key)) => Some(
                Arc::new(SupabaseEdgeFunctions::new(url, key.clone())?)
                    as Arc<dyn BaseEdgeFunctions>,
            ),
            _ => None,
        };

        let email = config.resend_api_key.clone().map(|key| {
            Arc::new(ResendAdapter::new(key, config.email_from.clone()))
                as Arc<dyn BaseEmailService>
        });

        if ai.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, topic classification is keyword-only");
        }
        if edge_functions.is_none() {
            tracing::warn!("SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY not set, scraping disabled");
        }
        if email.is_none() {
            tracing::warn!("RESEND_API_KEY not set, e-mail disabled");
        }

        Ok(Self {
            db_pool,
            ai,
            edge_functions,
            email,
            jobs,
            app_base_url: config.app_base_url.clone(),
            session_ttl_hours: config.session_ttl_hours,
            sync_stale_after_hours: config.sync_stale_after_hours,
        })
    }

    pub fn edge_functions(&self) -> Result<&Arc<dyn BaseEdgeFunctions>> {
        self.edge_functions
            .as_ref()
            .ok_or_else(|| MissingConfig("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY").into())
    }

    pub fn email(&self) -> Result<&Arc<dyn BaseEmailService>> {
        self.email
            .as_ref()
            .ok_or_else(|| MissingConfig("RESEND_API_KEY").into())
    }
}
