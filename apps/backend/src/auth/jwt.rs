use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::Duration;
use tracing::debug;

use super::claims::{Claims, TokenType};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::security_config::SecurityConfig;

fn mint(
    sub: &str,
    email: &str,
    typ: TokenType,
    ttl: Duration,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        typ,
        iat,
        exp: iat + ttl.whole_seconds(),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Mint an HS256 access token valid for `security.access_ttl`.
pub fn mint_access_token(
    sub: &str,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(sub, email, TokenType::Access, security.access_ttl, now, security)
}

/// Mint a refresh token valid for `security.refresh_ttl`.
pub fn mint_refresh_token(
    sub: &str,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    mint(sub, email, TokenType::Refresh, security.refresh_ttl, now, security)
}

/// Verify a token's signature, expiry and type.
///
/// Errors:
/// - expired → `UNAUTHORIZED_EXPIRED_JWT`
/// - bad signature or malformed → `UNAUTHORIZED_INVALID_JWT`
/// - valid token of another type → `INVALID_TOKEN_TYPE`
pub fn verify_token(
    token: &str,
    expected: TokenType,
    security: &SecurityConfig,
) -> Result<Claims, AppError> {
    let validation = Validation::new(security.algorithm);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        kind => {
            debug!(?kind, "jwt rejected");
            AppError::unauthorized_invalid_jwt()
        }
    })?;

    if claims.typ != expected {
        return Err(AppError::unauthorized(
            ErrorCode::InvalidTokenType,
            "Token type is not accepted here",
        ));
    }
    Ok(claims)
}
