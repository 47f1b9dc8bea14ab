//! Registration, password login, token refresh and password changes.

use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{check_strength, hash_password, verify_password};
use crate::auth::{mint_access_token, mint_refresh_token, verify_token, TokenType};
use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, UnauthorizedKind, ValidationKind,
};
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User, UserCreate};
use crate::state::security_config::SecurityConfig;

const MIN_FULL_NAME_LEN: usize = 2;

fn email_regex() -> &'static Regex {
    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    });
    &EMAIL
}

/// Trimmed, lowercased email, or `INVALID_EMAIL`.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    if email_regex().is_match(&email) {
        Ok(email)
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Email address is not valid",
        ))
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

fn issue_tokens(user: &User, security: &SecurityConfig) -> Result<TokenPair, AppError> {
    let now = SystemTime::now();
    Ok(TokenPair {
        access_token: mint_access_token(&user.sub, &user.email, now, security)?,
        refresh_token: mint_refresh_token(&user.sub, &user.email, now, security)?,
        token_type: "bearer",
        expires_in: security.access_ttl.whole_seconds(),
    })
}

pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    reg: Registration,
) -> Result<User, AppError> {
    let email = normalize_email(&reg.email)?;
    let full_name = reg.full_name.trim().to_string();
    if full_name.chars().count() < MIN_FULL_NAME_LEN {
        return Err(DomainError::validation_other(format!(
            "full_name must be at least {MIN_FULL_NAME_LEN} characters"
        ))
        .into());
    }
    check_strength(&reg.password)?;

    if users::find_by_email(conn, &email).await?.is_some() {
        return Err(
            DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered").into(),
        );
    }

    let password_hash = hash_password(&reg.password)?;
    let dto = UserCreate::new(Uuid::new_v4().to_string(), email, password_hash)
        .with_full_name(full_name)
        .with_company_name(reg.company_name.filter(|c| !c.trim().is_empty()));
    let user = users::create_user(conn, dto).await?;

    info!(user_id = user.id, email = %Redacted(&user.email), "user registered");
    Ok(user)
}

pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    email: &str,
    password: &str,
) -> Result<TokenPair, AppError> {
    let invalid = || {
        DomainError::unauthorized(
            UnauthorizedKind::InvalidCredentials,
            "Incorrect email or password",
        )
    };

    let email = email.trim().to_lowercase();
    let Some(user) = users::find_by_email(conn, &email).await? else {
        warn!(email = %Redacted(&email), "login for unknown email");
        return Err(invalid().into());
    };
    if !verify_password(password, &user.password_hash) {
        warn!(user_id = user.id, "login with wrong password");
        return Err(invalid().into());
    }
    if !user.is_active {
        return Err(
            DomainError::forbidden(ForbiddenKind::UserInactive, "User account is inactive").into(),
        );
    }

    users::record_login(conn, user.id).await?;
    info!(user_id = user.id, "login succeeded");
    issue_tokens(&user, security)
}

/// Exchange a refresh token for a fresh pair. The user must still exist
/// and be active.
pub async fn refresh<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    refresh_token: &str,
) -> Result<TokenPair, AppError> {
    let claims = verify_token(refresh_token, TokenType::Refresh, security)?;

    let user = users::find_by_sub(conn, &claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            DomainError::unauthorized(UnauthorizedKind::UnknownUser, "User not found or inactive")
        })?;

    issue_tokens(&user, security)
}

pub async fn change_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: &User,
    current_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    if !verify_password(current_password, &user.password_hash) {
        return Err(DomainError::validation(
            ValidationKind::IncorrectPassword,
            "Current password is incorrect",
        )
        .into());
    }
    check_strength(new_password)?;

    let hash = hash_password(new_password)?;
    users::update_password_hash(conn, user.id, hash).await?;
    info!(user_id = user.id, "password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Ada.Lovelace@Example.COM ").unwrap(),
            "ada.lovelace@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "plainaddress", "a@b", "two@@example.com", "sp ace@example.com"] {
            assert!(
                matches!(
                    normalize_email(bad),
                    Err(DomainError::Validation(ValidationKind::InvalidEmail, _))
                ),
                "{bad} should be rejected"
            );
        }
    }
}
