//! SeaORM adapter for the subscriptions table (at most one row per user).

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::subscriptions::{self, PlanType, SubscriptionStatus};

/// Limits copied from the plan catalog at grant time.
#[derive(Debug, Clone)]
pub struct SubscriptionGrant {
    pub user_id: i64,
    pub plan_type: PlanType,
    pub forecasts_limit: Option<i32>,
    pub cities_limit: i32,
    pub api_calls_limit: Option<i32>,
    pub period_end: Option<OffsetDateTime>,
}

pub async fn find_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<subscriptions::Model>, sea_orm::DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Insert, or reset the user's existing row to an active period on the new plan.
pub async fn grant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SubscriptionGrant,
) -> Result<subscriptions::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let existing = find_by_user(conn, dto.user_id).await?;

    let active = subscriptions::ActiveModel {
        id: existing.as_ref().map_or(NotSet, |s| Set(s.id)),
        user_id: Set(dto.user_id),
        plan_type: Set(dto.plan_type),
        status: Set(SubscriptionStatus::Active),
        current_period_start: Set(now),
        current_period_end: Set(dto.period_end),
        cancel_at_period_end: Set(false),
        cancelled_at: Set(None),
        forecasts_limit: Set(dto.forecasts_limit),
        forecasts_used: Set(0),
        cities_limit: Set(dto.cities_limit),
        api_calls_limit: Set(dto.api_calls_limit),
        api_calls_used: Set(0),
        created_at: existing.as_ref().map_or(Set(now), |_| NotSet),
        updated_at: Set(now),
    };

    match existing {
        Some(_) => active.update(conn).await,
        None => active.insert(conn).await,
    }
}

/// Spend one forecast if the row still has quota. The limit is checked by
/// the UPDATE itself; `false` means nothing was spent.
pub async fn spend_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    subscription_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let has_quota = Condition::any()
        .add(subscriptions::Column::ForecastsLimit.is_null())
        .add(
            Expr::col(subscriptions::Column::ForecastsUsed)
                .lt(Expr::col(subscriptions::Column::ForecastsLimit)),
        );

    let res = subscriptions::Entity::update_many()
        .col_expr(
            subscriptions::Column::ForecastsUsed,
            Expr::col(subscriptions::Column::ForecastsUsed).add(1),
        )
        .col_expr(
            subscriptions::Column::UpdatedAt,
            Expr::value(OffsetDateTime::now_utc()),
        )
        .filter(subscriptions::Column::Id.eq(subscription_id))
        .filter(has_quota)
        .exec(conn)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn cancel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    subscription_id: i64,
    immediately: bool,
) -> Result<subscriptions::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let mut active = subscriptions::ActiveModel {
        id: Set(subscription_id),
        updated_at: Set(now),
        ..Default::default()
    };
    if immediately {
        active.status = Set(SubscriptionStatus::Cancelled);
        active.cancelled_at = Set(Some(now));
    } else {
        active.cancel_at_period_end = Set(true);
    }
    active.update(conn).await
}

pub async fn count_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Active))
        .count(conn)
        .await
}
