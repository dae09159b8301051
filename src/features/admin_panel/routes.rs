use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::core::middleware::admin_session_middleware;
use crate::features::admin_panel::handlers;
use crate::features::admin_panel::resource::{AdminResource, ResourceMetadata};
use crate::features::admin_panel::services::AdminAuthService;
use crate::features::admins::services::ADMIN_RESOURCE;
use crate::features::admins::AdminService;
use crate::features::categories::services::CATEGORY_RESOURCE;
use crate::features::categories::CategoryService;
use crate::features::manufacturers::services::MANUFACTURER_RESOURCE;
use crate::features::manufacturers::ManufacturerService;
use crate::features::products::services::PRODUCT_RESOURCE;
use crate::features::products::ProductService;

/// Every resource mounted under `/admin`, in navigation order
pub fn registered_resources() -> [&'static ResourceMetadata; 4] {
    [
        &CATEGORY_RESOURCE,
        &MANUFACTURER_RESOURCE,
        &PRODUCT_RESOURCE,
        &ADMIN_RESOURCE,
    ]
}

/// CRUD routes for one resource, relative to `/admin`
fn resource_routes<R: AdminResource>(resource: Arc<R>) -> Router {
    let name = resource.metadata().name;

    Router::new()
        .route(
            &format!("/{}", name),
            get(handlers::list_records::<R>).post(handlers::create_record::<R>),
        )
        .route(
            &format!("/{}/{{id}}", name),
            get(handlers::show_record::<R>)
                .put(handlers::update_record::<R>)
                .delete(handlers::delete_record::<R>),
        )
        .with_state(resource)
}

/// Create routes for the admin panel, to be nested under `/admin`
///
/// Everything except login and logout requires a valid session cookie.
pub fn routes(
    auth: Arc<AdminAuthService>,
    categories: Arc<CategoryService>,
    manufacturers: Arc<ManufacturerService>,
    products: Arc<ProductService>,
    admins: Arc<AdminService>,
) -> Router {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/resources", get(handlers::list_resources))
        .merge(resource_routes(categories))
        .merge(resource_routes(manufacturers))
        .merge(resource_routes(products))
        .merge(resource_routes(admins))
        .route_layer(from_fn_with_state(auth.clone(), admin_session_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .with_state(auth)
        .merge(protected)
}
