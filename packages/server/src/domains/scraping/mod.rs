// Scraping domain - report orchestration
//
// Responsibilities:
// - Validating submissions and opening reports
// - Handing collection to the hosted Edge Functions
// - Turning stored reviews into the report analysis

pub mod actions;
pub mod jobs;

pub use actions::{
    activate_sources, request_sync, start_report, ActivateSourcesResult, StartReportRequest,
    StartReportResult,
};
pub use jobs::ReportJobHandler;
