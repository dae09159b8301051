use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::products::models::{Product, ProductWithRelations};
use crate::shared::types::SortDirection;
use crate::shared::validation::not_blank;

fn default_true() -> bool {
    true
}

/// Product columns plus the derived image lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
    pub category_id: i32,
    pub manufacturer_id: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Preview image followed by image1..image4, unset ones skipped
    pub images: Vec<String>,
    /// image1..image4, unset ones skipped
    pub additional_images: Vec<String>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let images = p.images();
        let additional_images = p.additional_images();
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            preview_image: p.preview_image,
            image1: p.image1,
            image2: p.image2,
            image3: p.image3,
            image4: p.image4,
            category_id: p.category_id,
            manufacturer_id: p.manufacturer_id,
            is_active: p.is_active,
            sort_order: p.sort_order,
            created_at: p.created_at,
            updated_at: p.updated_at,
            images,
            additional_images,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ManufacturerSummaryDto {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ManufacturerDetailDto {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// Product as it appears in the public list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListItemDto {
    #[serde(flatten)]
    pub product: ProductDto,
    pub category: CategorySummaryDto,
    pub manufacturer: ManufacturerSummaryDto,
}

impl From<ProductWithRelations> for ProductListItemDto {
    fn from(row: ProductWithRelations) -> Self {
        Self {
            category: CategorySummaryDto {
                id: row.product.category_id,
                name: row.category_name,
            },
            manufacturer: ManufacturerSummaryDto {
                id: row.product.manufacturer_id,
                name: row.manufacturer_name,
                country: row.manufacturer_country,
            },
            product: row.product.into(),
        }
    }
}

/// Product with its full manufacturer, for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    #[serde(flatten)]
    pub product: ProductDto,
    pub category: CategorySummaryDto,
    pub manufacturer: ManufacturerDetailDto,
}

impl From<ProductWithRelations> for ProductDetailDto {
    fn from(row: ProductWithRelations) -> Self {
        Self {
            category: CategorySummaryDto {
                id: row.product.category_id,
                name: row.category_name,
            },
            manufacturer: ManufacturerDetailDto {
                id: row.product.manufacturer_id,
                name: row.manufacturer_name,
                country: row.manufacturer_country,
                website: row.manufacturer_website,
                description: row.manufacturer_description,
            },
            product: row.product.into(),
        }
    }
}

/// Sortable product fields, spelled as on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    Name,
    CreatedAt,
    UpdatedAt,
    #[default]
    SortOrder,
}

impl ProductSortField {
    pub const ALLOWED: [(&'static str, ProductSortField); 4] = [
        ("name", ProductSortField::Name),
        ("createdAt", ProductSortField::CreatedAt),
        ("updatedAt", ProductSortField::UpdatedAt),
        ("sortOrder", ProductSortField::SortOrder),
    ];

    pub fn column(&self) -> &'static str {
        match self {
            ProductSortField::Name => "p.name",
            ProductSortField::CreatedAt => "p.created_at",
            ProductSortField::UpdatedAt => "p.updated_at",
            ProductSortField::SortOrder => "p.sort_order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<i64>,
    pub prev_page: Option<i64>,
}

/// Validated filters echoed back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductFiltersDto {
    pub category_id: Option<i32>,
    pub manufacturer_id: Option<i32>,
    pub search: Option<String>,
    pub sort_by: ProductSortField,
    pub sort_order: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponseDto {
    pub products: Vec<ProductListItemDto>,
    pub pagination: PaginationDto,
    pub filters: ProductFiltersDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponseDto {
    pub product: ProductDetailDto,
}

/// Body of admin create and update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInputDto {
    #[validate(
        length(min = 1, max = 500, message = "name must be between 1 and 500 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    pub description: Option<String>,

    #[validate(
        url(message = "previewImage must be a valid URL"),
        length(max = 1000, message = "previewImage must be at most 1000 characters")
    )]
    pub preview_image: Option<String>,

    #[validate(
        url(message = "image1 must be a valid URL"),
        length(max = 1000, message = "image1 must be at most 1000 characters")
    )]
    pub image1: Option<String>,

    #[validate(
        url(message = "image2 must be a valid URL"),
        length(max = 1000, message = "image2 must be at most 1000 characters")
    )]
    pub image2: Option<String>,

    #[validate(
        url(message = "image3 must be a valid URL"),
        length(max = 1000, message = "image3 must be at most 1000 characters")
    )]
    pub image3: Option<String>,

    #[validate(
        url(message = "image4 must be a valid URL"),
        length(max = 1000, message = "image4 must be at most 1000 characters")
    )]
    pub image4: Option<String>,

    #[validate(range(min = 1, message = "categoryId must be greater than or equal to 1"))]
    pub category_id: i32,

    #[validate(range(min = 1, message = "manufacturerId must be greater than or equal to 1"))]
    pub manufacturer_id: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProductWithRelations {
        let now = Utc::now();
        ProductWithRelations {
            product: Product {
                id: 3,
                name: "Caramel Bar".to_string(),
                description: Some("Chewy".to_string()),
                preview_image: Some("https://cdn.example.com/bar.jpg".to_string()),
                image1: Some("https://cdn.example.com/bar-1.jpg".to_string()),
                image2: None,
                image3: None,
                image4: None,
                category_id: 5,
                manufacturer_id: 8,
                is_active: true,
                sort_order: 2,
                created_at: now,
                updated_at: now,
            },
            category_name: "Bars".to_string(),
            manufacturer_name: "Acme".to_string(),
            manufacturer_country: Some("USA".to_string()),
            manufacturer_website: Some("https://acme.example.com".to_string()),
            manufacturer_description: None,
        }
    }

    #[test]
    fn test_list_item_shape() {
        let json = serde_json::to_value(ProductListItemDto::from(row())).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["previewImage"], "https://cdn.example.com/bar.jpg");
        assert_eq!(json["categoryId"], 5);
        assert_eq!(json["category"], serde_json::json!({"id": 5, "name": "Bars"}));
        assert_eq!(
            json["manufacturer"],
            serde_json::json!({"id": 8, "name": "Acme", "country": "USA"})
        );
        assert_eq!(
            json["images"],
            serde_json::json!(["https://cdn.example.com/bar.jpg", "https://cdn.example.com/bar-1.jpg"])
        );
        assert_eq!(
            json["additionalImages"],
            serde_json::json!(["https://cdn.example.com/bar-1.jpg"])
        );
    }

    #[test]
    fn test_detail_has_full_manufacturer() {
        let json = serde_json::to_value(ProductDetailDto::from(row())).unwrap();
        assert_eq!(json["manufacturer"]["website"], "https://acme.example.com");
        assert!(json["manufacturer"]["description"].is_null());
    }

    #[test]
    fn test_input_defaults_and_validation() {
        let dto: ProductInputDto = serde_json::from_value(serde_json::json!({
            "name": "Nougat",
            "categoryId": 1,
            "manufacturerId": 2,
        }))
        .unwrap();
        assert!(dto.is_active);
        assert_eq!(dto.sort_order, 0);
        assert!(dto.validate().is_ok());

        let bad: ProductInputDto = serde_json::from_value(serde_json::json!({
            "name": "",
            "previewImage": "not-a-url",
            "categoryId": 0,
            "manufacturerId": 1,
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("preview_image"));
        assert!(fields.contains_key("category_id"));
        assert!(!fields.contains_key("manufacturer_id"));
    }
}
