// Companies domain - businesses that request VOC reports

pub mod models;

pub use models::*;
