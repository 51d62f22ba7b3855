use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tasklane_api::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ConfigError};
use crate::middleware::create_panic_handler;

pub mod health;

/// Full application router: health, the REST API, and the shared layers
pub fn create_router(state: AppState, config: &Config) -> Result<Router, ConfigError> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidCorsOrigin(config.cors_origin.clone()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/api/health", get(health::health_check))
        .merge(tasklane_api::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler()))
}
