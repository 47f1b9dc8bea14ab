pub mod agent_logs;
pub mod api_keys;
pub mod cities;
pub mod deep_reports;
pub mod forecasts;
pub mod payments;
pub mod products;
pub mod subscriptions;
pub mod users;

pub use agent_logs::Entity as AgentLogs;
pub use agent_logs::Model as AgentLog;
pub use api_keys::Entity as ApiKeys;
pub use api_keys::Model as ApiKey;
pub use cities::Entity as Cities;
pub use cities::Model as City;
pub use deep_reports::Entity as DeepReports;
pub use deep_reports::Model as DeepReport;
pub use forecasts::Entity as Forecasts;
pub use forecasts::Model as Forecast;
pub use payments::Entity as Payments;
pub use payments::Model as Payment;
pub use products::Entity as Products;
pub use products::Model as Product;
pub use subscriptions::Entity as Subscriptions;
pub use subscriptions::Model as Subscription;
pub use users::Entity as Users;
pub use users::Model as User;
