use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::utils::review_content_hash;
use crate::common::{CompanyId, Page, ReportId, ReviewId};
use crate::domains::analysis::ReviewInput;

/// A customer review collected from one platform
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub company_id: CompanyId,
    pub report_id: Option<ReportId>,
    pub source: String,
    pub text: String,
    pub rating: Option<f32>,
    pub author: Option<String>,
    pub review_date: Option<DateTime<Utc>>,
    pub url: Option<String>,
    /// Source + normalized text; one row per hash per company
    #[serde(skip_serializing)]
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub company_id: CompanyId,
    pub report_id: Option<ReportId>,
    pub source: String,
    pub text: String,
    pub rating: Option<f32>,
    pub author: Option<String>,
    pub review_date: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl Review {
    /// Shape used by the analysis engine.
    pub fn to_input(&self) -> ReviewInput {
        ReviewInput {
            text: self.text.clone(),
            rating: self.rating.map(f64::from),
            source: Some(self.source.clone()),
            date: self.review_date.map(|d| d.to_rfc3339()),
            author: self.author.clone(),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Review {
    /// Every review of a company, for analysis. Reports of the same company
    /// share one review set.
    pub async fn find_by_company(company_id: CompanyId, pool: &PgPool) -> Result<Vec<Self>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE company_id = $1 ORDER BY review_date NULLS LAST, created_at",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// One page of a company's reviews, newest review date first.
    pub async fn find_page_by_company(
        company_id: CompanyId,
        page: Page,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE company_id = $1
            ORDER BY review_date DESC NULLS LAST, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(company_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    pub async fn count_by_company(company_id: CompanyId, pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Insert a review. Returns `None` when the company already has a review
    /// with the same source and text.
    pub async fn insert(review: &NewReview, pool: &PgPool) -> Result<Option<Self>> {
        let inserted = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                id, company_id, report_id, source, text, rating, author, review_date, url, content_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (company_id, content_hash) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(ReviewId::new())
        .bind(review.company_id)
        .bind(review.report_id)
        .bind(&review.source)
        .bind(&review.text)
        .bind(review.rating)
        .bind(&review.author)
        .bind(review.review_date)
        .bind(&review.url)
        .bind(review_content_hash(&review.source, &review.text))
        .fetch_optional(pool)
        .await?;
        Ok(inserted)
    }
}
