use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin_panel::{dtos as admin_panel_dtos, handlers as admin_panel_handlers};
use crate::features::admin_panel::model::AuthenticatedAdmin;
use crate::features::admins::{dtos as admins_dtos, models as admins_models};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::system::{dtos as system_dtos, handlers as system_handlers};
use crate::shared::types::{ApiResponse, FieldError, Meta, SortDirection};

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        system_handlers::root,
        system_handlers::api_info,
        system_handlers::health,
        // Products (public)
        products_handlers::list_products,
        products_handlers::get_product,
        // Admin panel
        admin_panel_handlers::login,
        admin_panel_handlers::logout,
        admin_panel_handlers::me,
    ),
    components(
        schemas(
            // Shared
            Meta,
            FieldError,
            SortDirection,
            // System
            system_dtos::HealthDto,
            system_dtos::ApiInfoDto,
            system_dtos::RootInfoDto,
            system_dtos::NotFoundDto,
            ApiResponse<system_dtos::HealthDto>,
            ApiResponse<system_dtos::ApiInfoDto>,
            ApiResponse<system_dtos::RootInfoDto>,
            // Products
            products_dtos::ProductDto,
            products_dtos::CategorySummaryDto,
            products_dtos::ManufacturerSummaryDto,
            products_dtos::ManufacturerDetailDto,
            products_dtos::ProductListItemDto,
            products_dtos::ProductDetailDto,
            products_dtos::ProductSortField,
            products_dtos::PaginationDto,
            products_dtos::ProductFiltersDto,
            products_dtos::ProductListResponseDto,
            products_dtos::ProductDetailResponseDto,
            ApiResponse<products_dtos::ProductListResponseDto>,
            ApiResponse<products_dtos::ProductDetailResponseDto>,
            // Admin panel
            admins_models::AdminRole,
            admins_dtos::AdminResponseDto,
            admin_panel_dtos::LoginRequestDto,
            AuthenticatedAdmin,
            ApiResponse<admins_dtos::AdminResponseDto>,
            ApiResponse<AuthenticatedAdmin>,
        )
    ),
    tags(
        (name = "system", description = "Health check and API info"),
        (name = "products", description = "Public product catalog"),
        (name = "admin", description = "Admin panel session endpoints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Confectionery Catalog API",
        version = "0.1.0",
        description = "Public catalog API and admin panel endpoints",
    )
)]
pub struct ApiDoc;

/// Adds the admin session cookie security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("admin_session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/products", "/api/products/{id}", "/api/health", "/admin/login"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Sweets".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Sweets");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
