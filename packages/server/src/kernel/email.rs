// Resend implementation of BaseEmailService

use anyhow::{Context, Result};
use async_trait::async_trait;
use resend::{Email, ResendOptions, ResendService};

use super::{BaseEmailService, OutgoingEmail};

/// Wrapper around ResendService that implements BaseEmailService
pub struct ResendAdapter {
    service: ResendService,
    from: String,
}

impl ResendAdapter {
    pub fn new(api_key: String, from: impl Into<String>) -> Self {
        Self {
            service: ResendService::new(ResendOptions::new(api_key)),
            from: from.into(),
        }
    }
}

#[async_trait]
impl BaseEmailService for ResendAdapter {
    async fn send_email(&self, email: OutgoingEmail) -> Result<String> {
        let mut message = Email::html(&self.from, &email.to, &email.subject, &email.html);
        if let Some(text) = email.text {
            message = message.with_text(text);
        }

        let sent = self
            .service
            .send(message)
            .await
            .context("Failed to send e-mail via Resend")?;

        tracing::info!(email_id = %sent.id, "E-mail sent");
        Ok(sent.id)
    }
}
