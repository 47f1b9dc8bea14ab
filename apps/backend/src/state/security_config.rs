use jsonwebtoken::Algorithm;
use time::Duration;

use crate::config::Settings;

/// JWT signing material and token lifetimes.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            access_ttl: Duration::minutes(settings.access_token_expire_minutes),
            refresh_ttl: Duration::days(settings.refresh_token_expire_days),
            ..Self::new(settings.jwt_secret.clone())
        }
    }
}
