//! Rate limit inputs.
//!
//! - auth endpoints: `RATE_LIMIT_ANON` requests per window, keyed by client IP
//! - authenticated API: keyed by user, budget by tier (`RATE_LIMIT_BASIC`,
//!   `_PRO`, `_MASTER`, `_ADMIN`); callers without a valid bearer token
//!   share their IP's `RATE_LIMIT_BASIC` budget
//! - health and root: not limited
//!
//! Callers pair these with one shared `InMemoryBackend` so every worker
//! counts against the same window.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use actix_extensible_rate_limit::backend::{SimpleInput, SimpleInputFunctionBuilder};
use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::web;
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use super::jwt_extract::bearer_token;
use crate::auth::claims::TokenType;
use crate::auth::jwt::verify_token;
use crate::config::RateLimits;
use crate::db::require_db;
use crate::entities::subscriptions::PlanType;
use crate::entities::users::UserRole;
use crate::repos::{subscriptions, users};
use crate::state::app_state::AppState;

pub type RateLimitInputFuture = LocalBoxFuture<'static, Result<SimpleInput, actix_web::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    Basic,
    Pro,
    Master,
    Admin,
}

impl RateTier {
    /// Users without an active subscription get the basic budget.
    pub fn for_user(role: UserRole, active_plan: Option<PlanType>) -> Self {
        if role == UserRole::Admin {
            return RateTier::Admin;
        }
        match active_plan {
            Some(PlanType::Master) => RateTier::Master,
            Some(PlanType::Pro) => RateTier::Pro,
            Some(PlanType::Basic) | None => RateTier::Basic,
        }
    }

    pub fn limit(self, limits: &RateLimits) -> u64 {
        match self {
            RateTier::Basic => limits.basic,
            RateTier::Pro => limits.pro,
            RateTier::Master => limits.master,
            RateTier::Admin => limits.admin,
        }
    }
}

pub fn auth_rate_limit_config(limits: &RateLimits) -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(limits.window_seconds), limits.anon)
        .real_ip_key()
}

/// Input function for the API scope.
pub fn api_rate_limit_input(
    limits: &RateLimits,
) -> impl Fn(&ServiceRequest) -> RateLimitInputFuture + 'static {
    let limits = *limits;
    move |req: &ServiceRequest| {
        let interval = Duration::from_secs(limits.window_seconds);
        let ip_key = format!(
            "ip-{}",
            client_ip(req.connection_info().realip_remote_addr().unwrap_or("unknown"))
        );
        let caller = bearer_token(req.headers().get(header::AUTHORIZATION))
            .ok()
            .flatten()
            .zip(req.app_data::<web::Data<AppState>>().cloned())
            .and_then(|(token, state)| {
                verify_token(&token, TokenType::Access, &state.security)
                    .ok()
                    .map(|claims| (claims.sub, state))
            });

        Box::pin(async move {
            let (key, max_requests) = match caller {
                Some((sub, state)) => match caller_tier(&state, &sub).await {
                    Some((user_id, tier)) => (format!("user-{user_id}"), tier.limit(&limits)),
                    None => (ip_key, limits.basic),
                },
                None => (ip_key, limits.basic),
            };
            Ok(SimpleInput {
                interval,
                max_requests,
                key,
            })
        })
    }
}

/// `None` when the caller cannot be resolved; the request then counts
/// against its IP.
async fn caller_tier(state: &AppState, sub: &str) -> Option<(i64, RateTier)> {
    let db = require_db(state).ok()?;
    let user = match users::find_by_sub(db, sub).await {
        Ok(user) => user?,
        Err(err) => {
            debug!(error = %err, "rate limit user lookup failed");
            return None;
        }
    };
    let plan = match subscriptions::find_by_user(db, user.id).await {
        Ok(sub) => sub.filter(|s| s.is_active()).map(|s| s.plan_type),
        Err(err) => {
            debug!(error = %err, "rate limit subscription lookup failed");
            None
        }
    };
    Some((user.id, RateTier::for_user(user.role, plan)))
}

/// IP part of a `host[:port]` address; anything unparseable is used as-is.
fn client_ip(raw: &str) -> String {
    raw.parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| raw.parse::<IpAddr>())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
