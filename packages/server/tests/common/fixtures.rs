//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly. Every fixture gets a unique
//! e-mail so tests sharing the database never collide.

use anyhow::Result;
use execli_core::domains::companies::Company;
use execli_core::domains::reports::{NewReview, Review, VocReport};
use sqlx::PgPool;
use uuid::Uuid;

/// An address no other test will use
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Create an active company with a unique e-mail
pub async fn create_test_company(pool: &PgPool, name: &str, url: &str) -> Result<Company> {
    Company::find_or_create(name, &unique_email("owner"), url, None, pool).await
}

/// Create a processing report for `company` with the given active sources
pub async fn create_test_report(
    pool: &PgPool,
    company: &Company,
    sources: &[&str],
) -> Result<VocReport> {
    let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
    VocReport::create(
        company.id,
        &company.name,
        &company.url,
        &sources,
        "Report queued",
        pool,
    )
    .await
}

/// Insert a review as the scraping pipeline would
pub async fn insert_test_review(
    pool: &PgPool,
    report: &VocReport,
    source: &str,
    text: &str,
    rating: Option<f32>,
) -> Result<Option<Review>> {
    Review::insert(
        &NewReview {
            company_id: report.company_id,
            report_id: Some(report.id),
            source: source.to_string(),
            text: text.to_string(),
            rating,
            author: Some("Test Reviewer".to_string()),
            review_date: None,
            url: None,
        },
        pool,
    )
    .await
}
