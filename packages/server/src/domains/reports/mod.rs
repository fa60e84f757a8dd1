// Reports domain - VOC reports, stored reviews and review platform detection

pub mod actions;
pub mod models;
pub mod sources;

pub use actions::{ReportDetail, ReportStatusView, ReviewPage};
pub use models::*;
pub use sources::{detect_source_from_url, detect_sources};
