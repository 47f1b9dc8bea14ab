//! Error codes for the Commerce Intelligence API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of a ProblemDetails response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    InvalidTokenType,
    InvalidCredentials,
    InvalidApiKey,
    Forbidden,
    UserInactive,
    AdminRequired,
    SubscriptionTierRequired,
    SubscriptionInactive,
    ForecastQuotaExceeded,

    // Request Validation
    ValidationError,
    BadRequest,
    InvalidEmail,
    WeakPassword,
    IncorrectPassword,
    InvalidPlan,
    NoCitiesAvailable,
    CannotDeactivateAdmin,

    // Resource Not Found
    NotFound,
    UserNotFound,
    ProductNotFound,
    ForecastNotFound,
    SubscriptionNotFound,
    ApiKeyNotFound,
    CityNotFound,

    // Business Conflicts
    EmailAlreadyRegistered,
    ForecastNotCompleted,
    Conflict,

    // System
    DbError,
    DbUnavailable,
    DbTimeout,
    AgentFailed,
    UpstreamUnavailable,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Canonical string as it appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InvalidTokenType => "INVALID_TOKEN_TYPE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::Forbidden => "FORBIDDEN",
            Self::UserInactive => "USER_INACTIVE",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::SubscriptionTierRequired => "SUBSCRIPTION_TIER_REQUIRED",
            Self::SubscriptionInactive => "SUBSCRIPTION_INACTIVE",
            Self::ForecastQuotaExceeded => "FORECAST_QUOTA_EXCEEDED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::InvalidPlan => "INVALID_PLAN",
            Self::NoCitiesAvailable => "NO_CITIES_AVAILABLE",
            Self::CannotDeactivateAdmin => "CANNOT_DEACTIVATE_ADMIN",

            Self::NotFound => "NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::ForecastNotFound => "FORECAST_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::ApiKeyNotFound => "API_KEY_NOT_FOUND",
            Self::CityNotFound => "CITY_NOT_FOUND",

            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::ForecastNotCompleted => "FORECAST_NOT_COMPLETED",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::AgentFailed => "AGENT_FAILED",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
