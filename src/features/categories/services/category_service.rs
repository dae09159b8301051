use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{is_foreign_key_violation, map_db_error, AppError, Result};
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admin_panel::resource::{
    AdminResource, ResourceMetadata, SortProperty, CATALOG_NAVIGATION,
};
use crate::features::admins::models::AdminRole;
use crate::features::categories::dtos::{CategoryInputDto, CategoryResponseDto};
use crate::features::categories::models::Category;

pub static CATEGORY_RESOURCE: ResourceMetadata = ResourceMetadata {
    name: "categories",
    label: "Categories",
    navigation: CATALOG_NAVIGATION,
    title_property: "name",
    required_role: AdminRole::Moderator,
    list_properties: &["id", "name", "createdAt"],
    show_properties: &["id", "name", "createdAt", "updatedAt"],
    edit_properties: &["name"],
    filters: &[],
    sortable: &[
        SortProperty {
            property: "id",
            column: "c.id",
        },
        SortProperty {
            property: "name",
            column: "c.name",
        },
        SortProperty {
            property: "createdAt",
            column: "c.created_at",
        },
        SortProperty {
            property: "updatedAt",
            column: "c.updated_at",
        },
    ],
    id_column: "c.id",
    search_columns: &["c.name"],
    default_sort_column: "c.id",
};

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminResource for CategoryService {
    type Record = CategoryResponseDto;
    type CreateInput = CategoryInputDto;
    type UpdateInput = CategoryInputDto;

    fn metadata(&self) -> &'static ResourceMetadata {
        &CATEGORY_RESOURCE
    }

    async fn list(&self, params: &AdminListParams) -> Result<(Vec<CategoryResponseDto>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories c");
        params.push_conditions(&mut count_query);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count categories: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT c.id, c.name, c.created_at, c.updated_at FROM categories c",
        );
        params.push_conditions(&mut query);
        params.push_order_and_page(&mut query);
        let categories = query
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((categories.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        category
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn create(&self, input: CategoryInputDto) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(input.name.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert category: {:?}", e);
            map_db_error(e)
        })?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);
        Ok(category.into())
    }

    async fn update(&self, id: i32, input: CategoryInputDto) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category {}: {:?}", id, e);
            map_db_error(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::BadRequest(
                        "Category is used by existing products and cannot be deleted".to_string(),
                    );
                }
                tracing::error!("Failed to delete category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn name(value: &str) -> CategoryInputDto {
        CategoryInputDto {
            name: value.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_crud(pool: PgPool) {
        let service = CategoryService::new(pool);
        let created = service.create(name("  Chocolate ")).await.unwrap();
        assert_eq!(created.name, "Chocolate");

        let updated = service.update(created.id, name("Dark Chocolate")).await.unwrap();
        assert_eq!(updated.name, "Dark Chocolate");
        assert!(updated.updated_at >= created.updated_at);

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.find(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_name_conflicts(pool: PgPool) {
        let service = CategoryService::new(pool);
        service.create(name("Candy")).await.unwrap();
        assert!(matches!(
            service.create(name("Candy")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_referenced_category_cannot_be_deleted(pool: PgPool) {
        let service = CategoryService::new(pool.clone());
        let category = service.create(name("Toffee")).await.unwrap();
        let manufacturer_id: i32 =
            sqlx::query_scalar("INSERT INTO manufacturers (name) VALUES ('Acme') RETURNING id")
                .fetch_one(&pool)
                .await
                .unwrap();
        sqlx::query("INSERT INTO products (name, category_id, manufacturer_id) VALUES ('Bar', $1, $2)")
            .bind(category.id)
            .bind(manufacturer_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            service.delete(category.id).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_search(pool: PgPool) {
        let service = CategoryService::new(pool);
        for n in ["Chocolate", "Caramel", "Hot Chocolate"] {
            service.create(name(n)).await.unwrap();
        }

        let params: HashMap<String, String> = [("search", "CHOC"), ("sortBy", "name")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let list = AdminListParams::from_params(&params, &CATEGORY_RESOURCE).unwrap();
        let (records, total) = service.list(&list).await.unwrap();

        assert_eq!(total, 2);
        let names: Vec<_> = records.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Chocolate", "Hot Chocolate"]);
    }
}
