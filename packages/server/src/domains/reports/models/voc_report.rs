use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::common::{CompanyId, ReportId};

/// Report lifecycle: processing → complete | error
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Processing,
    Complete,
    Error,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Processing => write!(f, "processing"),
            ReportStatus::Complete => write!(f, "complete"),
            ReportStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processing" => Ok(ReportStatus::Processing),
            "complete" => Ok(ReportStatus::Complete),
            "error" => Ok(ReportStatus::Error),
            _ => Err(anyhow::anyhow!("Invalid report status: {}", s)),
        }
    }
}

/// Voice of Customer report for one business
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VocReport {
    pub id: ReportId,
    pub company_id: CompanyId,
    pub business_name: String,
    pub business_url: String,
    pub status: String, // 'processing' | 'complete' | 'error'
    pub progress_message: Option<String>,
    pub analysis: Option<JsonValue>,
    /// Platforms the pipeline scrapes
    pub sources: Vec<String>,
    /// Platforms found on the business site but not yet activated
    pub detected_sources: Vec<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl VocReport {
    pub fn report_status(&self) -> Option<ReportStatus> {
        self.status.parse().ok()
    }

    pub async fn create(
        company_id: CompanyId,
        business_name: &str,
        business_url: &str,
        sources: &[String],
        progress_message: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let report = sqlx::query_as::<_, VocReport>(
            r#"
            INSERT INTO voc_reports (
                id, company_id, business_name, business_url, status, progress_message, sources
            )
            VALUES ($1, $2, $3, $4, 'processing', $5, $6)
            RETURNING *
            "#,
        )
        .bind(ReportId::new())
        .bind(company_id)
        .bind(business_name)
        .bind(business_url)
        .bind(progress_message)
        .bind(sources)
        .fetch_one(pool)
        .await?;
        Ok(report)
    }

    pub async fn find_by_id(id: ReportId, pool: &PgPool) -> Result<Option<Self>> {
        let report = sqlx::query_as::<_, VocReport>("SELECT * FROM voc_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(report)
    }

    /// Update the human-readable progress line, moving the report back to
    /// `processing` and clearing any previous error.
    pub async fn set_progress(id: ReportId, message: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE voc_reports
            SET status = 'processing',
                progress_message = $2,
                error_message = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(message)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn mark_complete(id: ReportId, analysis: &JsonValue, pool: &PgPool) -> Result<Self> {
        let report = sqlx::query_as::<_, VocReport>(
            r#"
            UPDATE voc_reports
            SET status = 'complete',
                analysis = $2,
                progress_message = 'Report ready',
                error_message = NULL,
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(analysis)
        .fetch_one(pool)
        .await?;
        Ok(report)
    }

    pub async fn mark_error(id: ReportId, message: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE voc_reports
            SET status = 'error',
                error_message = $2,
                progress_message = 'Failed',
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(message)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn set_detected_sources(
        id: ReportId,
        detected: &[String],
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE voc_reports SET detected_sources = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(detected)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Add sources to the active set and remove them from the detected set.
    pub async fn activate_sources(id: ReportId, sources: &[String], pool: &PgPool) -> Result<Self> {
        let report = sqlx::query_as::<_, VocReport>(
            r#"
            UPDATE voc_reports
            SET sources = ARRAY(
                    SELECT DISTINCT s FROM unnest(sources || $2::TEXT[]) AS s ORDER BY s
                ),
                detected_sources = ARRAY(
                    SELECT d FROM unnest(detected_sources) AS d WHERE d <> ALL($2::TEXT[])
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sources)
        .fetch_one(pool)
        .await?;
        Ok(report)
    }

    /// Complete or stalled processing reports whose last update is older
    /// than `cutoff`. Errored reports wait for a manual sync.
    pub async fn find_stale(cutoff: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        let reports = sqlx::query_as::<_, VocReport>(
            r#"
            SELECT * FROM voc_reports
            WHERE status IN ('complete', 'processing')
              AND updated_at < $1
            ORDER BY updated_at
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_display() {
        for status in [
            ReportStatus::Processing,
            ReportStatus::Complete,
            ReportStatus::Error,
        ] {
            assert_eq!(status.to_string().parse::<ReportStatus>().unwrap(), status);
        }
        assert!("done".parse::<ReportStatus>().is_err());
    }
}
