// Execli Voice of Customer API - Core
//
// This crate provides the backend API behind the Execli web app: report
// orchestration, review analysis, accounts and notifications.
// Architecture follows domain-driven design; infrastructure sits behind
// kernel traits so domains can be tested with mocks.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
