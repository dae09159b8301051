//! Application router: feature routes, Swagger UI and the tower-http stack.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware::from_fn,
    Router,
};
use sqlx::PgPool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::admin_panel::{routes as admin_panel_routes, AdminAuthService, SessionManager};
use crate::features::admins::AdminService;
use crate::features::categories::CategoryService;
use crate::features::manufacturers::ManufacturerService;
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::system::{handlers as system_handlers, routes as system_routes};

/// 180 days
const HSTS_HEADER_VALUE: &str = "max-age=15552000; includeSubDomains";

/// Services shared by the request handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub categories: Arc<CategoryService>,
    pub manufacturers: Arc<ManufacturerService>,
    pub admins: Arc<AdminService>,
    pub admin_auth: Arc<AdminAuthService>,
}

impl AppServices {
    pub fn new(pool: PgPool, sessions: SessionManager) -> Self {
        let admins = Arc::new(AdminService::new(pool.clone()));
        Self {
            products: Arc::new(ProductService::new(pool.clone())),
            categories: Arc::new(CategoryService::new(pool.clone())),
            manufacturers: Arc::new(ManufacturerService::new(pool)),
            admin_auth: Arc::new(AdminAuthService::new(Arc::clone(&admins), sessions)),
            admins,
        }
    }
}

fn swagger_routes(config: &Config) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

pub fn build_router(services: &AppServices, config: &Config) -> Router {
    let admin_routes = admin_panel_routes::routes(
        Arc::clone(&services.admin_auth),
        Arc::clone(&services.categories),
        Arc::clone(&services.manufacturers),
        Arc::clone(&services.products),
        Arc::clone(&services.admins),
    );

    let router = Router::new()
        .merge(swagger_routes(config))
        .merge(system_routes::routes(config.app.environment))
        .merge(products_routes::routes(Arc::clone(&services.products)))
        .nest("/admin", admin_routes)
        .fallback(system_handlers::not_found)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    // HSTS only when served over HTTPS in production
    let router = if config.app.environment.is_production() {
        router.layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_HEADER_VALUE),
        ))
    } else {
        router
    };

    router
        .layer(CompressionLayer::new())
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
