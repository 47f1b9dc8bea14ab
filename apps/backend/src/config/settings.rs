//! Environment-driven application settings.
//!
//! Everything is read once at startup by [`Settings::from_env`]; handlers
//! reach it through `AppState`.

use std::env;
use std::str::FromStr;

use db_infra::db::{DbKind, RuntimeEnv};

use crate::error::AppError;

pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub basic: u64,
    pub pro: u64,
    pub master: u64,
    pub admin: u64,
    pub anon: u64,
    pub window_seconds: u64,
}

/// Deep report prices in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepReportPrices {
    pub standard: i64,
    pub premium: i64,
    pub enterprise: i64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub api_v1_prefix: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: Vec<u8>,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub agent_timeout_seconds: u64,
    pub agent_max_retries: u32,
    pub agent_concurrent_limit: usize,

    pub rate_limits: RateLimits,
    pub cors_allowed_origins: Vec<String>,

    pub max_cities_per_forecast: u64,
    pub min_city_population: i64,
    pub deep_report_prices: DeepReportPrices,

    pub db_env: RuntimeEnv,
    pub db_kind: DbKind,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses `name` when set, otherwise returns `default`.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} must be a valid number, got '{raw}'"))),
        _ => Ok(default),
    }
}

fn positive(name: &str, value: u64) -> Result<u64, AppError> {
    if value == 0 {
        return Err(AppError::config(format!("{name} must be positive")));
    }
    Ok(value)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::config(format!(
                "BACKEND_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        let rate_limits = RateLimits {
            basic: positive("RATE_LIMIT_BASIC", parse_var("RATE_LIMIT_BASIC", 100)?)?,
            pro: positive("RATE_LIMIT_PRO", parse_var("RATE_LIMIT_PRO", 500)?)?,
            master: positive("RATE_LIMIT_MASTER", parse_var("RATE_LIMIT_MASTER", 2000)?)?,
            admin: positive("RATE_LIMIT_ADMIN", parse_var("RATE_LIMIT_ADMIN", 10_000)?)?,
            anon: positive("RATE_LIMIT_ANON", parse_var("RATE_LIMIT_ANON", 10)?)?,
            window_seconds: positive(
                "RATE_LIMIT_WINDOW_SECONDS",
                parse_var("RATE_LIMIT_WINDOW_SECONDS", 60)?,
            )?,
        };

        let environment = var_or("ENVIRONMENT", "development");
        let db_env = match env::var("DB_ENV") {
            Ok(raw) => RuntimeEnv::from_str(&raw)?,
            Err(_) if environment.eq_ignore_ascii_case("test") => RuntimeEnv::Test,
            Err(_) => RuntimeEnv::Prod,
        };
        let db_kind = match env::var("DB_KIND") {
            Ok(raw) => DbKind::from_str(&raw)?,
            Err(_) => DbKind::Postgres,
        };

        Ok(Self {
            app_name: var_or("APP_NAME", "Commerce Intelligence Platform"),
            app_version: var_or("APP_VERSION", env!("CARGO_PKG_VERSION")),
            environment,
            api_v1_prefix: var_or("API_V1_PREFIX", "/api/v1"),
            host: var_or("BACKEND_HOST", "0.0.0.0"),
            port: parse_var("BACKEND_PORT", 8000)?,

            jwt_secret: jwt_secret.into_bytes(),
            access_token_expire_minutes: parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            refresh_token_expire_days: parse_var("REFRESH_TOKEN_EXPIRE_DAYS", 7)?,

            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openai_model: var_or("OPENAI_MODEL", "gpt-4-turbo-preview"),
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            agent_timeout_seconds: positive(
                "AGENT_TIMEOUT_SECONDS",
                parse_var("AGENT_TIMEOUT_SECONDS", 300)?,
            )?,
            agent_max_retries: parse_var("AGENT_MAX_RETRIES", 3)?,
            agent_concurrent_limit: parse_var("AGENT_CONCURRENT_LIMIT", 5usize)?.max(1),

            rate_limits,
            cors_allowed_origins: parse_origins(&var_or(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:3000,http://localhost:8000",
            )),

            max_cities_per_forecast: parse_var("MAX_CITIES_PER_FORECAST", 100)?,
            min_city_population: parse_var("MIN_CITY_POPULATION", 50_000)?,
            deep_report_prices: DeepReportPrices {
                standard: parse_var("DEEP_REPORT_STANDARD_PRICE", 1000)?,
                premium: parse_var("DEEP_REPORT_PREMIUM_PRICE", 3000)?,
                enterprise: parse_var("DEEP_REPORT_ENTERPRISE_PRICE", 5000)?,
            },

            db_env,
            db_kind,
        })
    }

    /// Deterministic settings for tests: in-memory SQLite, short timeouts,
    /// generous rate limits and no LLM key.
    pub fn for_tests() -> Self {
        Self {
            app_name: "Commerce Intelligence Platform".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "test".to_string(),
            api_v1_prefix: "/api/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: b"test-secret-that-is-at-least-32-bytes!!".to_vec(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            openai_api_key: None,
            openai_model: "gpt-4-turbo-preview".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            agent_timeout_seconds: 5,
            agent_max_retries: 1,
            agent_concurrent_limit: 5,
            rate_limits: RateLimits {
                basic: 10_000,
                pro: 10_000,
                master: 10_000,
                admin: 10_000,
                anon: 10_000,
                window_seconds: 60,
            },
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            max_cities_per_forecast: 100,
            min_city_population: 50_000,
            deep_report_prices: DeepReportPrices {
                standard: 1000,
                premium: 3000,
                enterprise: 5000,
            },
            db_env: RuntimeEnv::Test,
            db_kind: DbKind::SqliteMemory,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
