//! Back-office operations. Callers must already be authorized as admin.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::adapters::Page;
use crate::domain::plans::parse_plan;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::subscriptions::{self, Subscription};
use crate::repos::users::{self, User};
use crate::repos::{forecasts, products};

/// Length of a granted billing period.
pub const GRANT_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct UserCounts {
    pub total: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Total {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveCount {
    pub active: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStats {
    pub users: UserCounts,
    pub forecasts: Total,
    pub products: Total,
    pub subscriptions: ActiveCount,
}

pub async fn stats<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<PlatformStats, AppError> {
    Ok(PlatformStats {
        users: UserCounts {
            total: users::count_users(conn, false).await?,
            active: users::count_users(conn, true).await?,
        },
        forecasts: Total {
            total: forecasts::count_forecasts(conn).await?,
        },
        products: Total {
            total: products::count_products(conn).await?,
        },
        subscriptions: ActiveCount {
            active: subscriptions::count_active(conn).await?,
        },
    })
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: Page,
) -> Result<(Vec<User>, u64), AppError> {
    Ok(users::list_users(conn, page).await?)
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    active: bool,
) -> Result<User, AppError> {
    let user = users::require_user(conn, user_id).await?;
    if !active && user.is_admin() {
        return Err(DomainError::validation(
            ValidationKind::CannotDeactivateAdmin,
            "Admin accounts cannot be deactivated",
        )
        .into());
    }

    let user = users::set_active(conn, user_id, active).await?;
    info!(user_id, active, "user activation changed");
    Ok(user)
}

/// Activate `plan_id` for the user for one billing period.
pub async fn grant_subscription<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    plan_id: &str,
) -> Result<Subscription, AppError> {
    let plan = parse_plan(plan_id).ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidPlan, format!("Unknown plan '{plan_id}'"))
    })?;
    users::require_user(conn, user_id).await?;

    let period_end = OffsetDateTime::now_utc() + Duration::days(GRANT_PERIOD_DAYS);
    let sub = subscriptions::grant(conn, user_id, plan, Some(period_end)).await?;
    info!(user_id, plan = plan.as_id(), "subscription granted");
    Ok(sub)
}
