use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CompanyId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    Active,
    Blocked,
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyStatus::Active => write!(f, "active"),
            CompanyStatus::Blocked => write!(f, "blocked"),
        }
    }
}

impl std::str::FromStr for CompanyStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(CompanyStatus::Active),
            "blocked" => Ok(CompanyStatus::Blocked),
            _ => Err(anyhow::anyhow!("Invalid company status: {}", s)),
        }
    }
}

/// Business that requested one or more VOC reports
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    pub url: String,
    pub ip_address: Option<String>,
    pub status: String, // 'active' | 'blocked'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Company {
    pub fn is_blocked(&self) -> bool {
        self.status.parse::<CompanyStatus>().ok() == Some(CompanyStatus::Blocked)
    }

    /// Find the company for this e-mail + URL pair, creating it if needed.
    ///
    /// An existing row keeps its id and status; name and IP are refreshed.
    pub async fn find_or_create(
        name: &str,
        email: &str,
        url: &str,
        ip_address: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, email, url, ip_address, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            ON CONFLICT (email, url) DO UPDATE
            SET name = EXCLUDED.name,
                ip_address = COALESCE(EXCLUDED.ip_address, companies.ip_address),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(CompanyId::new())
        .bind(name)
        .bind(email)
        .bind(url)
        .bind(ip_address)
        .fetch_one(pool)
        .await?;
        Ok(company)
    }

    pub async fn find_by_id(id: CompanyId, pool: &PgPool) -> Result<Option<Self>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(company)
    }

    pub async fn set_status(id: CompanyId, status: CompanyStatus, pool: &PgPool) -> Result<Self> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_one(pool)
        .await?;
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [CompanyStatus::Active, CompanyStatus::Blocked] {
            assert_eq!(status.to_string().parse::<CompanyStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<CompanyStatus>().is_err());
    }
}
