use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admin_panel::resource::{
    AdminResource, FilterKind, FilterProperty, ResourceMetadata, SortProperty,
    CATALOG_NAVIGATION,
};
use crate::features::admins::models::AdminRole;
use crate::features::products::dtos::{
    ProductDetailResponseDto, ProductDto, ProductInputDto, ProductListItemDto,
    ProductListResponseDto,
};
use crate::features::products::models::{Product, ProductWithRelations};
use crate::features::products::query::ProductListQuery;
use crate::shared::validation::blank_to_none;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.preview_image, \
     p.image1, p.image2, p.image3, p.image4, p.category_id, p.manufacturer_id, \
     p.is_active, p.sort_order, p.created_at, p.updated_at";

const RELATION_COLUMNS: &str = "c.name AS category_name, m.name AS manufacturer_name, \
     m.country AS manufacturer_country, m.website AS manufacturer_website, \
     m.description AS manufacturer_description";

const RELATION_JOINS: &str = " JOIN categories c ON c.id = p.category_id \
     JOIN manufacturers m ON m.id = p.manufacturer_id";

const RETURNING_PRODUCT: &str = " RETURNING id, name, description, preview_image, \
     image1, image2, image3, image4, category_id, manufacturer_id, \
     is_active, sort_order, created_at, updated_at";

pub static PRODUCT_RESOURCE: ResourceMetadata = ResourceMetadata {
    name: "products",
    label: "Products",
    navigation: CATALOG_NAVIGATION,
    title_property: "name",
    required_role: AdminRole::Moderator,
    list_properties: &[
        "id",
        "name",
        "previewImage",
        "categoryId",
        "manufacturerId",
        "isActive",
        "sortOrder",
    ],
    show_properties: &[
        "id",
        "name",
        "description",
        "previewImage",
        "image1",
        "image2",
        "image3",
        "image4",
        "categoryId",
        "manufacturerId",
        "isActive",
        "sortOrder",
        "createdAt",
        "updatedAt",
    ],
    edit_properties: &[
        "name",
        "description",
        "previewImage",
        "image1",
        "image2",
        "image3",
        "image4",
        "categoryId",
        "manufacturerId",
        "isActive",
        "sortOrder",
    ],
    filters: &[
        FilterProperty {
            property: "categoryId",
            column: "p.category_id",
            kind: FilterKind::Integer,
        },
        FilterProperty {
            property: "manufacturerId",
            column: "p.manufacturer_id",
            kind: FilterKind::Integer,
        },
        FilterProperty {
            property: "isActive",
            column: "p.is_active",
            kind: FilterKind::Boolean,
        },
    ],
    sortable: &[
        SortProperty {
            property: "id",
            column: "p.id",
        },
        SortProperty {
            property: "name",
            column: "p.name",
        },
        SortProperty {
            property: "sortOrder",
            column: "p.sort_order",
        },
        SortProperty {
            property: "createdAt",
            column: "p.created_at",
        },
        SortProperty {
            property: "updatedAt",
            column: "p.updated_at",
        },
    ],
    id_column: "p.id",
    search_columns: &["p.name"],
    default_sort_column: "p.id",
};

/// Foreign key failures on write point at the offending input field
fn map_product_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("products_category_id_fkey") => {
                return AppError::invalid_field("categoryId", "Category does not exist");
            }
            Some("products_manufacturer_id_fkey") => {
                return AppError::invalid_field("manufacturerId", "Manufacturer does not exist");
            }
            _ => {}
        }
    }
    map_db_error(e)
}

/// Service for product operations
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of active products with pagination and the applied filters
    pub async fn list_active(&self, query: &ProductListQuery) -> Result<ProductListResponseDto> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        query.push_conditions(&mut count_query);
        let total_count = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let mut page_query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {}, {} FROM products p{}",
            PRODUCT_COLUMNS, RELATION_COLUMNS, RELATION_JOINS
        ));
        query.push_conditions(&mut page_query);
        query.push_order_and_page(&mut page_query);
        let rows = page_query
            .build_query_as::<ProductWithRelations>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::debug!(
            "Listed {} of {} products (page {}, limit {})",
            rows.len(),
            total_count,
            query.page,
            query.limit
        );

        Ok(ProductListResponseDto {
            products: rows.into_iter().map(ProductListItemDto::from).collect(),
            pagination: query.pagination(total_count),
            filters: query.filters(),
        })
    }

    /// Active product by id with its category and manufacturer
    pub async fn get_active(&self, id: i32) -> Result<ProductDetailResponseDto> {
        let row = sqlx::query_as::<_, ProductWithRelations>(&format!(
            "SELECT {}, {} FROM products p{} WHERE p.id = $1 AND p.is_active = TRUE",
            PRODUCT_COLUMNS, RELATION_COLUMNS, RELATION_JOINS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        row.map(|r| ProductDetailResponseDto { product: r.into() })
            .ok_or_else(|| AppError::NotFound("Product not found or inactive".to_string()))
    }
}

#[async_trait]
impl AdminResource for ProductService {
    type Record = ProductDto;
    type CreateInput = ProductInputDto;
    type UpdateInput = ProductInputDto;

    fn metadata(&self) -> &'static ResourceMetadata {
        &PRODUCT_RESOURCE
    }

    async fn list(&self, params: &AdminListParams) -> Result<(Vec<ProductDto>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        params.push_conditions(&mut count_query);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products p", PRODUCT_COLUMNS));
        params.push_conditions(&mut query);
        params.push_order_and_page(&mut query);
        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((products.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<ProductDto> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products p WHERE p.id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    async fn create(&self, input: ProductInputDto) -> Result<ProductDto> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                name, description, preview_image, image1, image2, image3, image4,
                category_id, manufacturer_id, is_active, sort_order
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            {}
            "#,
            RETURNING_PRODUCT
        ))
        .bind(input.name.trim())
        .bind(blank_to_none(input.description))
        .bind(blank_to_none(input.preview_image))
        .bind(blank_to_none(input.image1))
        .bind(blank_to_none(input.image2))
        .bind(blank_to_none(input.image3))
        .bind(blank_to_none(input.image4))
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.is_active)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert product: {:?}", e);
            map_product_write_error(e)
        })?;

        tracing::info!("Product created: id={}, name={}", product.id, product.name);
        Ok(product.into())
    }

    async fn update(&self, id: i32, input: ProductInputDto) -> Result<ProductDto> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, preview_image = $3,
                image1 = $4, image2 = $5, image3 = $6, image4 = $7,
                category_id = $8, manufacturer_id = $9, is_active = $10, sort_order = $11
            WHERE id = $12
            {}
            "#,
            RETURNING_PRODUCT
        ))
        .bind(input.name.trim())
        .bind(blank_to_none(input.description))
        .bind(blank_to_none(input.preview_image))
        .bind(blank_to_none(input.image1))
        .bind(blank_to_none(input.image2))
        .bind(blank_to_none(input.image3))
        .bind(blank_to_none(input.image4))
        .bind(input.category_id)
        .bind(input.manufacturer_id)
        .bind(input.is_active)
        .bind(input.sort_order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product {}: {:?}", id, e);
            map_product_write_error(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {:?}", id, e);
                map_db_error(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }
}
