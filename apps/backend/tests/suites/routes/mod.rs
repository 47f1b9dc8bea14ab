mod admin;
mod api_keys;
mod auth;
mod cities;
mod error_shape;
mod forecasts;
mod health;
mod products;
mod rate_limiting;
mod security_headers;
mod subscriptions;
