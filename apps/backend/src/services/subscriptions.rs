//! Subscription lookups, demo checkout, cancellation and tier gating.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;
use ulid::Ulid;

use crate::domain::plans::{parse_plan, plan_for};
use crate::entities::payments::{PaymentStatus, PaymentType};
use crate::entities::subscriptions::PlanType;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind, ValidationKind};
use crate::repos::payments::{self, PaymentCreate};
use crate::repos::subscriptions::{self, Subscription};

/// No payment provider is wired in; checkout sessions point here.
const DEMO_CHECKOUT_URL: &str = "https://checkout.example.com/session";

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub session_id: String,
}

fn no_subscription() -> DomainError {
    DomainError::not_found(NotFoundKind::Subscription, "No subscription found")
}

pub async fn current<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Subscription, AppError> {
    Ok(subscriptions::find_by_user(conn, user_id)
        .await?
        .ok_or_else(no_subscription)?)
}

/// Record a pending subscription payment for `plan_id` and hand back a
/// checkout session.
pub async fn checkout<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    plan_id: &str,
) -> Result<CheckoutSession, AppError> {
    let plan_type = parse_plan(plan_id).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidPlan,
            format!("Unknown plan '{plan_id}'"),
        )
    })?;
    let plan = plan_for(plan_type);
    let session_id = format!("cs_{}", Ulid::new().to_string().to_lowercase());

    let payment = payments::create_payment(
        conn,
        PaymentCreate {
            user_id,
            payment_type: PaymentType::Subscription,
            status: PaymentStatus::Pending,
            amount: plan.price_cents(),
            currency: plan.currency.to_string(),
            description: Some(format!("{} plan, billed monthly", plan.name)),
            item_name: Some(plan.name.to_string()),
            checkout_session_id: Some(session_id.clone()),
        },
    )
    .await?;

    info!(
        user_id,
        payment_id = payment.id,
        plan = plan_type.as_id(),
        amount_usd = payment.amount_in_dollars(),
        "checkout session created"
    );

    Ok(CheckoutSession {
        checkout_url: format!("{DEMO_CHECKOUT_URL}/{session_id}"),
        session_id,
    })
}

pub async fn cancel<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    immediately: bool,
) -> Result<Subscription, AppError> {
    let sub = current(conn, user_id).await?;
    let sub = subscriptions::cancel(conn, sub.id, immediately).await?;
    info!(user_id, subscription_id = sub.id, immediately, "subscription cancelled");
    Ok(sub)
}

/// Gate a feature on plan tier.
///
/// No subscription or a lower tier is 403 `SUBSCRIPTION_TIER_REQUIRED`;
/// a subscription that is not active is 402 `SUBSCRIPTION_INACTIVE`.
pub fn require_tier(sub: Option<&Subscription>, min: PlanType) -> Result<&Subscription, AppError> {
    let tier_required = || {
        DomainError::forbidden(
            ForbiddenKind::TierRequired,
            format!("This feature requires the {} plan or higher", min.as_id()),
        )
    };

    let sub = sub.ok_or_else(tier_required)?;
    if !sub.is_active() {
        return Err(DomainError::forbidden(
            ForbiddenKind::SubscriptionInactive,
            "Subscription is not active",
        )
        .into());
    }
    if !sub.plan_type.at_least(min) {
        return Err(tier_required().into());
    }
    Ok(sub)
}
