//! Public product list query: parameter validation, WHERE composition,
//! ordering and pagination math.

use std::collections::HashMap;

use sqlx::{Postgres, QueryBuilder};

use crate::features::products::dtos::{PaginationDto, ProductFiltersDto, ProductSortField};
use crate::shared::constants::{DEFAULT_PRODUCT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SEARCH_LENGTH};
use crate::shared::query::{contains_pattern, ParamReader};
use crate::shared::types::{total_pages, FieldError, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListQuery {
    pub page: i64,
    pub limit: i64,
    pub category_id: Option<i32>,
    pub manufacturer_id: Option<i32>,
    pub search: Option<String>,
    pub sort_by: ProductSortField,
    pub sort_order: SortDirection,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PRODUCT_PAGE_SIZE,
            category_id: None,
            manufacturer_id: None,
            search: None,
            sort_by: ProductSortField::default(),
            sort_order: SortDirection::default(),
        }
    }
}

impl ProductListQuery {
    /// Validate the raw query string. Every offending parameter is reported.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let defaults = Self::default();
        let mut reader = ParamReader::new(params);

        let max_id = i64::from(i32::MAX);
        let query = Self {
            page: reader.int("page", 1, max_id).unwrap_or(defaults.page),
            limit: reader.int("limit", 1, MAX_PAGE_SIZE).unwrap_or(defaults.limit),
            category_id: reader.int("categoryId", 1, max_id).map(|id| id as i32),
            manufacturer_id: reader.int("manufacturerId", 1, max_id).map(|id| id as i32),
            search: reader.text("search", MAX_SEARCH_LENGTH),
            sort_by: reader
                .one_of("sortBy", &ProductSortField::ALLOWED)
                .unwrap_or(defaults.sort_by),
            sort_order: reader
                .one_of("sortOrder", &SortDirection::ALLOWED)
                .unwrap_or(defaults.sort_order),
        };

        reader.finish()?;
        Ok(query)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// ORDER BY keys. `sort_order` breaks ties for other fields and `id`
    /// always comes last so pages never overlap.
    pub fn order_by(&self) -> String {
        let mut keys = vec![format!(
            "{} {}",
            self.sort_by.column(),
            self.sort_order.as_sql()
        )];
        if self.sort_by != ProductSortField::SortOrder {
            keys.push("p.sort_order ASC".to_string());
        }
        keys.push("p.id ASC".to_string());
        keys.join(", ")
    }

    /// WHERE clause shared by the page and count queries
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE p.is_active = TRUE");

        if let Some(category_id) = self.category_id {
            qb.push(" AND p.category_id = ").push_bind(category_id);
        }
        if let Some(manufacturer_id) = self.manufacturer_id {
            qb.push(" AND p.manufacturer_id = ").push_bind(manufacturer_id);
        }
        if let Some(search) = &self.search {
            qb.push(" AND p.name ILIKE ")
                .push_bind(contains_pattern(search));
        }
    }

    pub fn push_order_and_page(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ")
            .push(self.order_by())
            .push(" LIMIT ")
            .push_bind(self.limit)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }

    pub fn pagination(&self, total_count: i64) -> PaginationDto {
        let total_pages = total_pages(total_count, self.limit);
        let has_next_page = self.page < total_pages;
        let has_prev_page = self.page > 1;

        PaginationDto {
            current_page: self.page,
            total_pages,
            total_count,
            limit: self.limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then_some(self.page + 1),
            prev_page: has_prev_page.then_some(self.page - 1),
        }
    }

    pub fn filters(&self) -> ProductFiltersDto {
        ProductFiltersDto {
            category_id: self.category_id,
            manufacturer_id: self.manufacturer_id,
            search: self.search.clone(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}
