// Business domains
pub mod analysis;
pub mod auth;
pub mod companies;
pub mod email;
pub mod reports;
pub mod scraping;
