//! Subscription repository functions and the subscription domain model.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::subscriptions_sea::{self as subscriptions_adapter, SubscriptionGrant};
use crate::domain::plans::plan_for;
use crate::entities::subscriptions::{self, PlanType, SubscriptionStatus};
use crate::errors::domain::{DomainError, ForbiddenKind};

/// Subscription domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub current_period_start: OffsetDateTime,
    pub current_period_end: Option<OffsetDateTime>,
    pub cancel_at_period_end: bool,
    pub cancelled_at: Option<OffsetDateTime>,
    pub forecasts_limit: Option<i32>,
    pub forecasts_used: i32,
    pub cities_limit: i32,
    pub api_calls_limit: Option<i32>,
    pub api_calls_used: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Unlimited plans always have quota.
    pub fn has_forecast_quota(&self) -> bool {
        match self.forecasts_limit {
            None => true,
            Some(limit) => self.forecasts_used < limit,
        }
    }
}

pub async fn find_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<Subscription>, DomainError> {
    let sub = subscriptions_adapter::find_by_user(conn, user_id).await?;
    Ok(sub.map(Subscription::from))
}

/// Activate `plan` for the user with the catalog's limits, replacing any
/// existing subscription and zeroing usage.
pub async fn grant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    plan: PlanType,
    period_end: Option<OffsetDateTime>,
) -> Result<Subscription, DomainError> {
    let limits = plan_for(plan);
    let sub = subscriptions_adapter::grant(
        conn,
        SubscriptionGrant {
            user_id,
            plan_type: plan,
            forecasts_limit: limits.forecasts_limit,
            cities_limit: limits.cities_limit,
            api_calls_limit: limits.api_calls_limit,
            period_end,
        },
    )
    .await?;
    Ok(Subscription::from(sub))
}

/// Spend one forecast from the subscription's quota, failing with
/// `QuotaExceeded` when the limit is already reached.
pub async fn spend_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    subscription_id: i64,
) -> Result<(), DomainError> {
    if subscriptions_adapter::spend_forecast(conn, subscription_id).await? {
        Ok(())
    } else {
        Err(quota_exceeded())
    }
}

pub fn quota_exceeded() -> DomainError {
    DomainError::forbidden(ForbiddenKind::QuotaExceeded, "Monthly forecast quota exceeded")
}

pub async fn cancel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    subscription_id: i64,
    immediately: bool,
) -> Result<Subscription, DomainError> {
    let sub = subscriptions_adapter::cancel(conn, subscription_id, immediately).await?;
    Ok(Subscription::from(sub))
}

pub async fn count_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(subscriptions_adapter::count_active(conn).await?)
}

impl From<subscriptions::Model> for Subscription {
    fn from(model: subscriptions::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            plan_type: model.plan_type,
            status: model.status,
            current_period_start: model.current_period_start,
            current_period_end: model.current_period_end,
            cancel_at_period_end: model.cancel_at_period_end,
            cancelled_at: model.cancelled_at,
            forecasts_limit: model.forecasts_limit,
            forecasts_used: model.forecasts_used,
            cities_limit: model.cities_limit,
            api_calls_limit: model.api_calls_limit,
            api_calls_used: model.api_calls_used,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
