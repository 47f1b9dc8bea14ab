//! Subscription plan catalog and tier ordering.

use serde::Serialize;

use crate::entities::subscriptions::PlanType;

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    #[serde(rename = "id")]
    pub plan: PlanType,
    pub name: &'static str,
    /// Whole dollars per month
    pub price: i64,
    pub currency: &'static str,
    pub interval: &'static str,
    /// `None` is unlimited
    pub forecasts_limit: Option<i32>,
    pub cities_limit: i32,
    pub api_calls_limit: Option<i32>,
    pub features: &'static [&'static str],
}

impl Plan {
    pub fn price_cents(&self) -> i64 {
        self.price * 100
    }
}

static PLANS: [Plan; 3] = [
    Plan {
        plan: PlanType::Basic,
        name: "Basic",
        price: 29,
        currency: "USD",
        interval: "month",
        forecasts_limit: Some(50),
        cities_limit: 10,
        api_calls_limit: Some(0),
        features: &[
            "50 forecasts/month",
            "Top 10 cities analyzed",
            "Summary reports",
            "Email support",
        ],
    },
    Plan {
        plan: PlanType::Pro,
        name: "Pro",
        price: 79,
        currency: "USD",
        interval: "month",
        forecasts_limit: Some(250),
        cities_limit: 50,
        api_calls_limit: Some(10_000),
        features: &[
            "250 forecasts/month",
            "Top 50 cities analyzed",
            "Detailed reports",
            "API access",
            "Priority support",
        ],
    },
    Plan {
        plan: PlanType::Master,
        name: "Master",
        price: 149,
        currency: "USD",
        interval: "month",
        forecasts_limit: None,
        cities_limit: 100,
        api_calls_limit: None,
        features: &[
            "Unlimited forecasts",
            "All cities analyzed",
            "Full analysis reports",
            "API access",
            "Custom reports",
            "Priority support",
            "Dedicated account manager",
        ],
    },
];

pub fn catalog() -> &'static [Plan] {
    &PLANS
}

pub fn plan_for(plan: PlanType) -> &'static Plan {
    match plan {
        PlanType::Basic => &PLANS[0],
        PlanType::Pro => &PLANS[1],
        PlanType::Master => &PLANS[2],
    }
}

/// Case-insensitive lookup by id ("basic", "pro", "master").
pub fn parse_plan(id: &str) -> Option<PlanType> {
    let id = id.trim();
    PLANS
        .iter()
        .find(|p| p.plan.as_id().eq_ignore_ascii_case(id))
        .map(|p| p.plan)
}

impl PlanType {
    pub fn as_id(self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Pro => "pro",
            PlanType::Master => "master",
        }
    }

    /// basic < pro < master
    pub fn tier(self) -> u8 {
        match self {
            PlanType::Basic => 1,
            PlanType::Pro => 2,
            PlanType::Master => 3,
        }
    }

    pub fn at_least(self, min: PlanType) -> bool {
        self.tier() >= min.tier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_by_tier() {
        let tiers: Vec<u8> = catalog().iter().map(|p| p.plan.tier()).collect();
        assert_eq!(tiers, [1, 2, 3]);
        for plan in catalog() {
            assert_eq!(plan_for(plan.plan).name, plan.name);
        }
    }

    #[test]
    fn limits_match_plan_table() {
        let basic = plan_for(PlanType::Basic);
        assert_eq!((basic.forecasts_limit, basic.cities_limit, basic.api_calls_limit), (Some(50), 10, Some(0)));
        let master = plan_for(PlanType::Master);
        assert_eq!(master.forecasts_limit, None);
        assert_eq!(master.price_cents(), 14_900);
    }

    #[test]
    fn parse_and_compare() {
        assert_eq!(parse_plan("PRO"), Some(PlanType::Pro));
        assert_eq!(parse_plan("gold"), None);
        assert!(PlanType::Master.at_least(PlanType::Pro));
        assert!(!PlanType::Basic.at_least(PlanType::Pro));
    }
}
