//! Minimal client for the Resend transactional e-mail API.
//!
//! ```rust,ignore
//! use resend::{Email, ResendOptions, ResendService};
//!
//! let service = ResendService::new(ResendOptions::new("re_123"));
//! let sent = service
//!     .send(Email::html("Execli <reports@execli.com>", "owner@shop.com", "Hi", "<p>Hi</p>"))
//!     .await?;
//! ```

pub mod models;

pub use models::{Email, SentEmail};

use thiserror::Error;

const BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resend API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid e-mail: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ResendError>;

#[derive(Debug, Clone)]
pub struct ResendOptions {
    pub api_key: String,
    pub base_url: String,
}

impl ResendOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResendService {
    client: reqwest::Client,
    options: ResendOptions,
}

impl ResendService {
    pub fn new(options: ResendOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Send one e-mail. Returns the provider's message id.
    pub async fn send(&self, email: Email) -> Result<SentEmail> {
        email.validate()?;

        let url = format!("{}/emails", self.options.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.api_key)
            .json(&email)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %message, "Resend returned an error");
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SentEmail = resp.json().await?;
        tracing::debug!(email_id = %sent.id, "E-mail accepted by Resend");
        Ok(sent)
    }
}
