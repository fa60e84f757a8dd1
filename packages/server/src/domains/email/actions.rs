//! Sending transactional e-mail.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use super::templates::report_ready;
use crate::common::utils::is_valid_email;
use crate::common::ReportId;
use crate::domains::reports::VocReport;
use crate::kernel::{OutgoingEmail, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default, alias = "reportId")]
    pub report_id: Option<ReportId>,
}

pub enum SendEmailResult {
    Sent { id: String },
    Invalid(String),
    ReportNotFound,
}

/// Send either the report-ready template (when `report_id` is given) or a
/// caller supplied subject + HTML body.
pub async fn send_email(request: SendEmailRequest, deps: &ServerDeps) -> Result<SendEmailResult> {
    let to = request.to.trim().to_string();
    if !is_valid_email(&to) {
        return Ok(SendEmailResult::Invalid("A valid recipient email is required".into()));
    }

    let email = match request.report_id {
        Some(report_id) => {
            let Some(report) = VocReport::find_by_id(report_id, &deps.db_pool).await? else {
                return Ok(SendEmailResult::ReportNotFound);
            };
            let rendered = report_ready(&report.business_name, &deps.app_base_url, report.id);
            OutgoingEmail {
                to,
                subject: request.subject.unwrap_or(rendered.subject),
                html: rendered.html,
                text: Some(rendered.text),
            }
        }
        None => {
            let subject = request.subject.filter(|s| !s.trim().is_empty());
            let html = request.html.filter(|h| !h.trim().is_empty());
            let (Some(subject), Some(html)) = (subject, html) else {
                return Ok(SendEmailResult::Invalid(
                    "subject and html are required without report_id".into(),
                ));
            };
            OutgoingEmail {
                to,
                subject,
                html,
                text: None,
            }
        }
    };

    let id = deps.email()?.send_email(email).await?;
    info!(email_id = %id, "Sent e-mail");
    Ok(SendEmailResult::Sent { id })
}

/// Tell the report owner their report is ready. Failures are logged, not
/// propagated; the report itself is already complete.
pub async fn notify_report_ready(report: &VocReport, to: &str, deps: &ServerDeps) {
    let Ok(service) = deps.email() else {
        tracing::debug!(report_id = %report.id, "E-mail not configured, skipping notification");
        return;
    };

    let rendered = report_ready(&report.business_name, &deps.app_base_url, report.id);
    let email = OutgoingEmail {
        to: to.to_string(),
        subject: rendered.subject,
        html: rendered.html,
        text: Some(rendered.text),
    };

    match service.send_email(email).await {
        Ok(id) => info!(report_id = %report.id, email_id = %id, "Report-ready e-mail sent"),
        Err(e) => tracing::warn!(report_id = %report.id, error = %e, "Report-ready e-mail failed"),
    }
}
