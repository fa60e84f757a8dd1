//! Account actions: signup, login, logout and session lookup.

use anyhow::Result;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::{NewUserAccount, UserAccount, UserPlan, UserSession};
use super::password::{check_password_strength, hash_password, verify_password};
use super::session::{generate_session_token, hash_session_token};
use crate::common::utils::{is_valid_email, normalize_email};
use crate::common::UserAccountId;
use crate::kernel::ServerDeps;

/// Shown for unknown e-mail and wrong password alike
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// What the API exposes about the signed-in user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    pub id: UserAccountId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub plan: UserPlan,
    /// `None` = unlimited
    pub report_allowance: Option<u32>,
}

impl From<&UserAccount> for UserProfile {
    fn from(user: &UserAccount) -> Self {
        let plan = user.user_plan();
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            company_name: user.company_name.clone(),
            plan,
            report_allowance: plan.report_allowance(),
        }
    }
}

/// A freshly issued session: the raw token goes into the cookie
pub struct IssuedSession {
    pub user: UserProfile,
    pub token: String,
}

pub enum SignupResult {
    Created(IssuedSession),
    Invalid(String),
    EmailTaken,
}

pub enum LoginResult {
    LoggedIn(IssuedSession),
    InvalidCredentials,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Create an account and sign it in.
pub async fn signup(request: SignupRequest, deps: &ServerDeps) -> Result<SignupResult> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Ok(SignupResult::Invalid("A valid email is required".to_string()));
    }
    if let Err(reason) = check_password_strength(&request.password) {
        return Ok(SignupResult::Invalid(reason));
    }

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let account = NewUserAccount {
        email,
        password_hash,
        first_name: clean(request.first_name),
        last_name: clean(request.last_name),
        company_name: clean(request.company_name),
    };

    let Some(user) = UserAccount::create(&account, &deps.db_pool).await? else {
        return Ok(SignupResult::EmailTaken);
    };

    info!(user_id = %user.id, "Account created");
    let session = issue_session(&user, deps).await?;
    Ok(SignupResult::Created(session))
}

/// Verify credentials and open a session.
pub async fn login(request: LoginRequest, deps: &ServerDeps) -> Result<LoginResult> {
    let email = normalize_email(&request.email);

    let Some(user) = UserAccount::find_by_email(&email, &deps.db_pool).await? else {
        return Ok(LoginResult::InvalidCredentials);
    };

    let password = request.password;
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    if !valid {
        return Ok(LoginResult::InvalidCredentials);
    }

    info!(user_id = %user.id, "User logged in");
    let session = issue_session(&user, deps).await?;
    Ok(LoginResult::LoggedIn(session))
}

/// Drop the session behind `token`. Unknown tokens are fine.
pub async fn logout(token: &str, deps: &ServerDeps) -> Result<()> {
    let removed = UserSession::delete_by_token_hash(&hash_session_token(token), &deps.db_pool).await?;
    if removed > 0 {
        info!("Session closed");
    }
    Ok(())
}

/// Account for a session token, if the session exists and has not expired.
pub async fn user_for_token(token: &str, deps: &ServerDeps) -> Result<Option<UserAccount>> {
    UserSession::find_user_by_token_hash(&hash_session_token(token), &deps.db_pool).await
}

async fn issue_session(user: &UserAccount, deps: &ServerDeps) -> Result<IssuedSession> {
    let token = generate_session_token();
    let expires_at = Utc::now() + Duration::hours(deps.session_ttl_hours);
    UserSession::create(user.id, &hash_session_token(&token), expires_at, &deps.db_pool).await?;

    Ok(IssuedSession {
        user: UserProfile::from(user),
        token,
    })
}
