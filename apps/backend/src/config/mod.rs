pub mod settings;

pub use settings::{DeepReportPrices, RateLimits, Settings};
