pub mod review;
pub mod voc_report;

pub use review::*;
pub use voc_report::*;
