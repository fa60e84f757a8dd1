// HTTP routes
pub mod analysis;
pub mod auth;
pub mod email;
pub mod health;
pub mod reports;
pub mod scrape;

pub use analysis::*;
pub use auth::*;
pub use email::*;
pub use health::*;
pub use reports::*;
pub use scrape::*;
