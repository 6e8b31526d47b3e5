use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// `*` allows any origin without credentials; an explicit list allows
/// credentials and mirrors the requested methods and headers.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.server.cors_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .merge(tutor_routes())
        .merge(learning_routes())
        .nest("/plot", plot_routes())
        .fallback(handlers::not_found)
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(
                    middlewares::trace::trace_context_middleware,
                ))
                .layer(middleware::from_fn(
                    middlewares::metrics::metrics_middleware,
                ))
                .layer(cors),
        )
}

fn tutor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/solve", post(handlers::tutor::solve_problem))
        .route("/generate", post(handlers::tutor::generate_question))
}

fn learning_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/statistics", get(handlers::statistics::get_statistics))
        .route("/memory", get(handlers::memory::get_memory))
        .route("/daily", get(handlers::daily::get_daily_question))
        .route("/daily/submit", post(handlers::daily::submit_daily_answer))
}

fn plot_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/execute", post(handlers::plot::execute_plot))
        .route("/generate", post(handlers::plot::generate_plot_code))
}
