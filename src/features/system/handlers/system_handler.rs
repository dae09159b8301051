use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, http::Uri, Json};
use chrono::Utc;

use crate::core::config::Environment;
use crate::features::system::dtos::{ApiInfoDto, HealthDto, NotFoundDto, RootInfoDto};
use crate::shared::types::ApiResponse;

const SERVICE_NAME: &str = "Confectionery Catalog API";

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse<HealthDto>)
    ),
    tag = "system"
)]
pub async fn health(State(environment): State<Environment>) -> Json<ApiResponse<HealthDto>> {
    Json(ApiResponse::success(
        Some(HealthDto {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            environment: environment.to_string(),
        }),
        Some("API is up".to_string()),
        None,
    ))
}

/// API name, version and endpoint map
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "API info", body = ApiResponse<ApiInfoDto>)
    ),
    tag = "system"
)]
pub async fn api_info() -> Json<ApiResponse<ApiInfoDto>> {
    let endpoints = BTreeMap::from([
        ("health".to_string(), "GET /api/health".to_string()),
        ("products".to_string(), "GET /api/products".to_string()),
        ("product".to_string(), "GET /api/products/{id}".to_string()),
        ("admin".to_string(), "/admin".to_string()),
    ]);

    Json(ApiResponse::success(
        Some(ApiInfoDto {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints,
        }),
        None,
        None,
    ))
}

/// Entry points of the service
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Root info", body = ApiResponse<RootInfoDto>)
    ),
    tag = "system"
)]
pub async fn root() -> Json<ApiResponse<RootInfoDto>> {
    Json(ApiResponse::success(
        Some(RootInfoDto {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            admin: "/admin".to_string(),
            api: "/api".to_string(),
            health: "/api/health".to_string(),
            docs: "/swagger-ui".to_string(),
        }),
        None,
        None,
    ))
}

/// JSON 404 for every unmatched path
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<NotFoundDto>>) {
    tracing::debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse {
            success: false,
            data: Some(NotFoundDto {
                path: uri.path().to_string(),
            }),
            message: Some("Endpoint not found".to_string()),
            meta: None,
            errors: None,
        }),
    )
}
