use serde::{Deserialize, Serialize};

use crate::ResendError;

/// Outgoing e-mail as accepted by `POST /emails`.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl Email {
    pub fn html(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            html: Some(html.into()),
            text: None,
            reply_to: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ResendError> {
        if self.to.is_empty() || self.to.iter().any(|addr| !addr.contains('@')) {
            return Err(ResendError::Invalid("recipient address is invalid".into()));
        }
        if self.subject.trim().is_empty() {
            return Err(ResendError::Invalid("subject is empty".into()));
        }
        if self.html.is_none() && self.text.is_none() {
            return Err(ResendError::Invalid("body is empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentEmail {
    pub id: String,
}
