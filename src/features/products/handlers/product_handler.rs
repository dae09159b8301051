use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::products::dtos::{ProductDetailResponseDto, ProductListResponseDto};
use crate::features::products::query::ProductListQuery;
use crate::features::products::services::ProductService;
use crate::shared::query::{parse_id, single_valued};
use crate::shared::types::ApiResponse;

/// List active products
///
/// Unknown parameters and invalid values are rejected with one error per field.
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 20)"),
        ("categoryId" = Option<i32>, Query, description = "Only products of this category"),
        ("manufacturerId" = Option<i32>, Query, description = "Only products of this manufacturer"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring of the product name"),
        ("sortBy" = Option<String>, Query, description = "name | createdAt | updatedAt | sortOrder (default)"),
        ("sortOrder" = Option<String>, Query, description = "ASC (default) | DESC")
    ),
    responses(
        (status = 200, description = "Page of products", body = ApiResponse<ProductListResponseDto>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<ProductListResponseDto>>> {
    let params = single_valued(pairs).map_err(AppError::Validation)?;
    let query = ProductListQuery::from_params(&params).map_err(AppError::Validation)?;
    let result = service.list_active(&query).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Get an active product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductDetailResponseDto>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Product not found or inactive")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailResponseDto>>> {
    let product = service.get_active(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}
