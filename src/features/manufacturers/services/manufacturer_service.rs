use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{is_foreign_key_violation, map_db_error, AppError, Result};
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admin_panel::resource::{
    AdminResource, FilterKind, FilterProperty, ResourceMetadata, SortProperty,
    CATALOG_NAVIGATION,
};
use crate::features::admins::models::AdminRole;
use crate::features::manufacturers::dtos::{ManufacturerInputDto, ManufacturerResponseDto};
use crate::features::manufacturers::models::Manufacturer;
use crate::shared::validation::blank_to_none;

const MANUFACTURER_COLUMNS: &str =
    "m.id, m.name, m.country, m.website, m.description, m.created_at, m.updated_at";

pub static MANUFACTURER_RESOURCE: ResourceMetadata = ResourceMetadata {
    name: "manufacturers",
    label: "Manufacturers",
    navigation: CATALOG_NAVIGATION,
    title_property: "name",
    required_role: AdminRole::Moderator,
    list_properties: &["id", "name", "country", "website"],
    show_properties: &[
        "id",
        "name",
        "country",
        "website",
        "description",
        "createdAt",
        "updatedAt",
    ],
    edit_properties: &["name", "country", "website", "description"],
    filters: &[FilterProperty {
        property: "country",
        column: "m.country",
        kind: FilterKind::Text,
    }],
    sortable: &[
        SortProperty {
            property: "id",
            column: "m.id",
        },
        SortProperty {
            property: "name",
            column: "m.name",
        },
        SortProperty {
            property: "country",
            column: "m.country",
        },
        SortProperty {
            property: "createdAt",
            column: "m.created_at",
        },
    ],
    id_column: "m.id",
    search_columns: &["m.name"],
    default_sort_column: "m.id",
};

/// Service for manufacturer operations
pub struct ManufacturerService {
    pool: PgPool,
}

impl ManufacturerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminResource for ManufacturerService {
    type Record = ManufacturerResponseDto;
    type CreateInput = ManufacturerInputDto;
    type UpdateInput = ManufacturerInputDto;

    fn metadata(&self) -> &'static ResourceMetadata {
        &MANUFACTURER_RESOURCE
    }

    async fn list(&self, params: &AdminListParams) -> Result<(Vec<ManufacturerResponseDto>, i64)> {
        let mut count_query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM manufacturers m");
        params.push_conditions(&mut count_query);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count manufacturers: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM manufacturers m",
            MANUFACTURER_COLUMNS
        ));
        params.push_conditions(&mut query);
        params.push_order_and_page(&mut query);
        let manufacturers = query
            .build_query_as::<Manufacturer>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list manufacturers: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((manufacturers.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<ManufacturerResponseDto> {
        sqlx::query_as::<_, Manufacturer>(&format!(
            "SELECT {} FROM manufacturers m WHERE m.id = $1",
            MANUFACTURER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get manufacturer {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Manufacturer {} not found", id)))
    }

    async fn create(&self, input: ManufacturerInputDto) -> Result<ManufacturerResponseDto> {
        let manufacturer = sqlx::query_as::<_, Manufacturer>(
            r#"
            INSERT INTO manufacturers (name, country, website, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, country, website, description, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(blank_to_none(input.country))
        .bind(blank_to_none(input.website))
        .bind(blank_to_none(input.description))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert manufacturer: {:?}", e);
            map_db_error(e)
        })?;

        tracing::info!(
            "Manufacturer created: id={}, name={}",
            manufacturer.id,
            manufacturer.name
        );
        Ok(manufacturer.into())
    }

    async fn update(&self, id: i32, input: ManufacturerInputDto) -> Result<ManufacturerResponseDto> {
        sqlx::query_as::<_, Manufacturer>(
            r#"
            UPDATE manufacturers
            SET name = $1, country = $2, website = $3, description = $4
            WHERE id = $5
            RETURNING id, name, country, website, description, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(blank_to_none(input.country))
        .bind(blank_to_none(input.website))
        .bind(blank_to_none(input.description))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update manufacturer {}: {:?}", id, e);
            map_db_error(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Manufacturer {} not found", id)))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::BadRequest(
                        "Manufacturer is used by existing products and cannot be deleted"
                            .to_string(),
                    );
                }
                tracing::error!("Failed to delete manufacturer {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Manufacturer {} not found", id)));
        }

        tracing::info!("Manufacturer deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn input(name: &str, country: Option<&str>) -> ManufacturerInputDto {
        ManufacturerInputDto {
            name: name.to_string(),
            country: country.map(str::to_string),
            website: None,
            description: Some("  ".to_string()),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_normalizes_blank_fields(pool: PgPool) {
        let service = ManufacturerService::new(pool);
        let created = service.create(input("Acme", Some(" USA "))).await.unwrap();
        assert_eq!(created.country.as_deref(), Some("USA"));
        assert_eq!(created.description, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_country_filter(pool: PgPool) {
        let service = ManufacturerService::new(pool);
        service.create(input("Acme", Some("USA"))).await.unwrap();
        service.create(input("Cacao SA", Some("Switzerland"))).await.unwrap();
        service.create(input("Nameless", None)).await.unwrap();

        let params: HashMap<String, String> =
            HashMap::from([("country".to_string(), "swiss".to_string())]);
        let list = AdminListParams::from_params(&params, &MANUFACTURER_RESOURCE).unwrap();
        let (records, total) = service.list(&list).await.unwrap();
        assert_eq!(total, 0);
        assert!(records.is_empty());

        let params: HashMap<String, String> =
            HashMap::from([("country".to_string(), "switz".to_string())]);
        let list = AdminListParams::from_params(&params, &MANUFACTURER_RESOURCE).unwrap();
        let (records, total) = service.list(&list).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(records[0].name, "Cacao SA");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_referenced_manufacturer_cannot_be_deleted(pool: PgPool) {
        let service = ManufacturerService::new(pool.clone());
        let manufacturer = service.create(input("Acme", Some("USA"))).await.unwrap();
        let category_id: i32 =
            sqlx::query_scalar("INSERT INTO categories (name) VALUES ('Bars') RETURNING id")
                .fetch_one(&pool)
                .await
                .unwrap();
        sqlx::query("INSERT INTO products (name, category_id, manufacturer_id) VALUES ('Bar', $1, $2)")
            .bind(category_id)
            .bind(manufacturer.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            service.delete(manufacturer.id).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(service.find(manufacturer.id).await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_missing_is_not_found(pool: PgPool) {
        let service = ManufacturerService::new(pool);
        assert!(matches!(
            service.update(9999, input("Ghost", None)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
