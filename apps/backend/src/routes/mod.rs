use actix_web::web;

use crate::extractors::pagination::query_config;
use crate::middleware::JwtExtract;

pub mod admin;
pub mod api_keys;
pub mod auth;
pub mod cities;
pub mod forecasts;
pub mod health;
pub mod products;
pub mod subscriptions;

/// Every authenticated resource below the API prefix except `/auth`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/products").configure(products::configure_routes))
        .service(web::scope("/forecasts").configure(forecasts::configure_routes))
        .service(web::scope("/subscriptions").configure(subscriptions::configure_routes))
        .service(web::scope("/cities").configure(cities::configure_routes))
        .service(web::scope("/api-keys").configure(api_keys::configure_routes))
        .service(web::scope("/admin").configure(admin::configure_routes));
}

/// Full route table without rate limiting.
///
/// `main.rs` assembles the same scopes with a rate limiter on each; tests
/// use this so endpoint behavior can be exercised without tripping limits.
pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    cfg.app_data(query_config())
        .configure(health::configure_routes)
        .service(
            web::scope(&format!("{api_prefix}/auth"))
                .wrap(JwtExtract)
                .configure(auth::configure_routes),
        )
        .service(
            web::scope(api_prefix)
                .wrap(JwtExtract)
                .configure(configure_api),
        );
}
