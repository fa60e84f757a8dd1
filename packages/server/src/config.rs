use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Public URL of the web app, used for report links in e-mails
    pub app_base_url: String,

    /// Supabase project URL; Edge Functions live under `/functions/v1/`
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,

    pub openai_api_key: Option<String>,
    pub openai_model: String,

    pub resend_api_key: Option<String>,
    pub email_from: String,

    pub session_ttl_hours: i64,
    pub sync_cron: String,
    pub sync_stale_after_hours: i64,

    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            supabase_url: optional("SUPABASE_URL"),
            supabase_service_role_key: optional("SUPABASE_SERVICE_ROLE_KEY"),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            resend_api_key: optional("RESEND_API_KEY"),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Execli <reports@execli.com>".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .context("SESSION_TTL_HOURS must be a number of hours")?,
            sync_cron: env::var("SYNC_CRON").unwrap_or_else(|_| "0 0 3 * * *".to_string()),
            sync_stale_after_hours: env::var("SYNC_STALE_AFTER_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()
                .context("SYNC_STALE_AFTER_HOURS must be a number of hours")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }

    /// Configuration for tests: no external services, no rate limiting.
    pub fn for_tests(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            port: 0,
            app_base_url: "http://localhost:3000".to_string(),
            supabase_url: None,
            supabase_service_role_key: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            resend_api_key: None,
            email_from: "Execli <reports@execli.com>".to_string(),
            session_ttl_hours: 168,
            sync_cron: "0 0 3 * * *".to_string(),
            sync_stale_after_hours: 168,
            allowed_origins: Vec::new(),
            rate_limit_enabled: false,
        }
    }
}

/// Unset and blank variables are both treated as missing.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" https://execli.com/, ,http://localhost:3000 "),
            vec!["https://execli.com", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_config_disables_rate_limiting() {
        let config = Config::for_tests("postgres://localhost/execli");
        assert!(!config.rate_limit_enabled);
        assert!(config.openai_api_key.is_none());
    }
}
