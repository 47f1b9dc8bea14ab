//! How to register an agent
//!
//! 1) Implement `Agent` for your type in its module.
//! 2) Add an `AgentFactory` entry below; keep ordering stable.

use super::{
    AdvertisingPlanner, Agent, AgentKind, MarketProfiler, ProductAnalyst, SalesStrategy,
    SupplyChainAdvisor,
};

pub struct AgentFactory {
    pub kind: AgentKind,
    pub name: &'static str,
    pub make: fn() -> Box<dyn Agent>,
}

static AGENT_FACTORIES: &[AgentFactory] = &[
    AgentFactory {
        kind: AgentKind::ProductAnalyst,
        name: AgentKind::ProductAnalyst.display_name(),
        make: make_product_analyst,
    },
    AgentFactory {
        kind: AgentKind::MarketProfiler,
        name: AgentKind::MarketProfiler.display_name(),
        make: make_market_profiler,
    },
    AgentFactory {
        kind: AgentKind::AdvertisingPlanner,
        name: AgentKind::AdvertisingPlanner.display_name(),
        make: make_advertising_planner,
    },
    AgentFactory {
        kind: AgentKind::SupplyChainAdvisor,
        name: AgentKind::SupplyChainAdvisor.display_name(),
        make: make_supply_chain_advisor,
    },
    AgentFactory {
        kind: AgentKind::SalesStrategy,
        name: AgentKind::SalesStrategy.display_name(),
        make: make_sales_strategy,
    },
];

fn make_product_analyst() -> Box<dyn Agent> {
    Box::new(ProductAnalyst)
}

fn make_market_profiler() -> Box<dyn Agent> {
    Box::new(MarketProfiler)
}

fn make_advertising_planner() -> Box<dyn Agent> {
    Box::new(AdvertisingPlanner)
}

fn make_supply_chain_advisor() -> Box<dyn Agent> {
    Box::new(SupplyChainAdvisor)
}

fn make_sales_strategy() -> Box<dyn Agent> {
    Box::new(SalesStrategy)
}

/// Statically registered agents in pipeline order.
pub fn registered_agents() -> &'static [AgentFactory] {
    AGENT_FACTORIES
}

pub fn by_kind(kind: AgentKind) -> Option<&'static AgentFactory> {
    registered_agents().iter().find(|f| f.kind == kind)
}
