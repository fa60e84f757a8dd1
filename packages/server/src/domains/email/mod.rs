// Email domain - report notifications and ad-hoc transactional mail

pub mod actions;
pub mod templates;

pub use actions::{notify_report_ready, send_email, SendEmailRequest, SendEmailResult};
