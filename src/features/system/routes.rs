use axum::{routing::get, Router};

use crate::core::config::Environment;
use crate::features::system::handlers;

/// Health and info routes (public)
pub fn routes(environment: Environment) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api", get(handlers::api_info))
        .route("/api/", get(handlers::api_info))
        .route("/api/health", get(handlers::health))
        .with_state(environment)
}
