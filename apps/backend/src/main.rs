use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use commerce_intel::config::Settings;
use commerce_intel::extractors::pagination::query_config;
use commerce_intel::infra::state::build_state;
use commerce_intel::middleware::rate_limit::{api_rate_limit_input, auth_rate_limit_config};
use commerce_intel::middleware::{
    cors_middleware, JwtExtract, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use commerce_intel::routes;
use commerce_intel::telemetry;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables come from the runtime (docker env_file, or a
    // sourced .env locally); nothing is read from disk here.
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let (host, port) = settings.bind_addr();

    let app_state = match build_state(settings).with_db().build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let settings = app_state.settings.clone();
    info!(
        app = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        llm_model = app_state.llm.model_id(),
        "starting on http://{host}:{port}"
    );

    let data = web::Data::new(app_state);
    // one backend per limit, shared by every worker
    let auth_backend = InMemoryBackend::builder().build();
    let api_backend = InMemoryBackend::builder().build();

    HttpServer::new(move || {
        let prefix = settings.api_v1_prefix.clone();
        let limits = &settings.rate_limits;
        let auth_limiter =
            RateLimiter::builder(auth_backend.clone(), auth_rate_limit_config(limits).build())
                .add_headers()
                .build();
        let api_limiter = RateLimiter::builder(api_backend.clone(), api_rate_limit_input(limits))
            .add_headers()
            .build();

        App::new()
            .wrap(cors_middleware(&settings))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(query_config())
            .configure(routes::health::configure_routes)
            .service(
                web::scope(&format!("{prefix}/auth"))
                    .wrap(JwtExtract)
                    .wrap(auth_limiter)
                    .configure(routes::auth::configure_routes),
            )
            .service(
                web::scope(&prefix)
                    .wrap(JwtExtract)
                    .wrap(api_limiter)
                    .configure(routes::configure_api),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
