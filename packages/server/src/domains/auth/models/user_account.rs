use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserAccountId;

/// Subscription plan. Each plan carries a report allowance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserPlan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl UserPlan {
    /// Reports allowed per account; `None` means unlimited.
    pub fn report_allowance(&self) -> Option<u32> {
        match self {
            UserPlan::Free => Some(1),
            UserPlan::Pro => Some(10),
            UserPlan::Enterprise => None,
        }
    }
}

impl std::fmt::Display for UserPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserPlan::Free => write!(f, "free"),
            UserPlan::Pro => write!(f, "pro"),
            UserPlan::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl std::str::FromStr for UserPlan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(UserPlan::Free),
            "pro" => Ok(UserPlan::Pro),
            "enterprise" => Ok(UserPlan::Enterprise),
            _ => Err(anyhow::anyhow!("Invalid plan: {}", s)),
        }
    }
}

/// Registered user of the web app
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: UserAccountId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub plan: String, // 'free' | 'pro' | 'enterprise'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
}

impl UserAccount {
    /// Unknown plan strings fall back to the free plan.
    pub fn user_plan(&self) -> UserPlan {
        self.plan.parse().unwrap_or_default()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl UserAccount {
    pub async fn find_by_id(id: UserAccountId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Lookup by e-mail; callers pass the normalized (lower-cased) address.
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user =
            sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(user)
    }

    /// Insert an account. Returns `None` when the e-mail is already taken.
    pub async fn create(account: &NewUserAccount, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO user_accounts (
                id, email, password_hash, first_name, last_name, company_name, plan
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'free')
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(UserAccountId::new())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.company_name)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_allowances() {
        assert_eq!(UserPlan::Free.report_allowance(), Some(1));
        assert_eq!(UserPlan::Pro.report_allowance(), Some(10));
        assert_eq!(UserPlan::Enterprise.report_allowance(), None);
    }

    #[test]
    fn plan_text_round_trip() {
        assert_eq!("pro".parse::<UserPlan>().unwrap(), UserPlan::Pro);
        assert_eq!(UserPlan::Enterprise.to_string(), "enterprise");
        assert!("gold".parse::<UserPlan>().is_err());
    }
}
