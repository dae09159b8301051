use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::config::BootstrapAdminConfig;
use crate::core::error::{map_db_error, AppError, Result};
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admin_panel::resource::{
    AdminResource, FilterKind, FilterProperty, ResourceMetadata, SortProperty,
    CATALOG_NAVIGATION,
};
use crate::features::admins::dtos::{AdminResponseDto, CreateAdminDto, UpdateAdminDto};
use crate::features::admins::models::{Admin, AdminRole};
use crate::features::admins::password;

const ADMIN_COLUMNS: &str = "a.id, a.email, a.password, a.name, a.role, a.is_active, \
                             a.last_login_at, a.created_at, a.updated_at";

pub static ADMIN_RESOURCE: ResourceMetadata = ResourceMetadata {
    name: "admins",
    label: "Admins",
    navigation: CATALOG_NAVIGATION,
    title_property: "name",
    required_role: AdminRole::SuperAdmin,
    list_properties: &["id", "email", "name", "role", "isActive", "lastLoginAt"],
    show_properties: &[
        "id",
        "email",
        "name",
        "role",
        "isActive",
        "lastLoginAt",
        "createdAt",
        "updatedAt",
    ],
    edit_properties: &["email", "password", "name", "role", "isActive"],
    filters: &[
        FilterProperty {
            property: "role",
            column: "a.role::text",
            kind: FilterKind::Choice(&["super_admin", "admin", "moderator"]),
        },
        FilterProperty {
            property: "isActive",
            column: "a.is_active",
            kind: FilterKind::Boolean,
        },
    ],
    sortable: &[
        SortProperty {
            property: "id",
            column: "a.id",
        },
        SortProperty {
            property: "email",
            column: "a.email",
        },
        SortProperty {
            property: "name",
            column: "a.name",
        },
        SortProperty {
            property: "role",
            column: "a.role",
        },
        SortProperty {
            property: "lastLoginAt",
            column: "a.last_login_at",
        },
        SortProperty {
            property: "createdAt",
            column: "a.created_at",
        },
    ],
    id_column: "a.id",
    search_columns: &["a.email", "a.name"],
    default_sort_column: "a.id",
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Service for admin accounts
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins a WHERE a.email = $1",
            ADMIN_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get admin by email: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Admin>> {
        sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins a WHERE a.id = $1",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get admin {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    /// Stamp `last_login_at` and return the refreshed row
    pub async fn record_login(&self, id: i32) -> Result<Admin> {
        sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins a SET last_login_at = NOW()
            WHERE a.id = $1
            RETURNING a.id, a.email, a.password, a.name, a.role, a.is_active,
                      a.last_login_at, a.created_at, a.updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record admin login: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Admin {} not found", id)))
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count admins: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Create the configured super admin when no admin exists yet.
    ///
    /// Returns the created admin, or `None` when the table already had rows.
    pub async fn ensure_bootstrap_admin(
        &self,
        config: &BootstrapAdminConfig,
    ) -> Result<Option<AdminResponseDto>> {
        if self.count().await? > 0 {
            tracing::debug!("Admins already exist, skipping bootstrap admin");
            return Ok(None);
        }

        let admin = self
            .create(CreateAdminDto {
                email: config.email.clone(),
                password: config.password.clone(),
                name: config.name.clone(),
                role: AdminRole::SuperAdmin,
                is_active: true,
            })
            .await?;

        tracing::info!("Bootstrap super admin created: id={}, email={}", admin.id, admin.email);
        Ok(Some(admin))
    }
}

#[async_trait]
impl AdminResource for AdminService {
    type Record = AdminResponseDto;
    type CreateInput = CreateAdminDto;
    type UpdateInput = UpdateAdminDto;

    fn metadata(&self) -> &'static ResourceMetadata {
        &ADMIN_RESOURCE
    }

    async fn list(&self, params: &AdminListParams) -> Result<(Vec<AdminResponseDto>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM admins a");
        params.push_conditions(&mut count_query);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count admins: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM admins a", ADMIN_COLUMNS));
        params.push_conditions(&mut query);
        params.push_order_and_page(&mut query);
        let admins: Vec<Admin> = query
            .build_query_as::<Admin>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list admins: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((admins.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<AdminResponseDto> {
        self.find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Admin {} not found", id)))
    }

    async fn create(&self, input: CreateAdminDto) -> Result<AdminResponseDto> {
        let password = password::prepare_for_storage(input.password).await?;

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, password, name, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password, name, role, is_active, last_login_at, created_at, updated_at
            "#,
        )
        .bind(normalize_email(&input.email))
        .bind(password)
        .bind(input.name.trim())
        .bind(input.role)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert admin: {:?}", e);
            map_db_error(e)
        })?;

        tracing::info!("Admin created: id={}, role={}", admin.id, admin.role);
        Ok(admin.into())
    }

    async fn update(&self, id: i32, input: UpdateAdminDto) -> Result<AdminResponseDto> {
        let password = match input.password {
            Some(value) => Some(password::prepare_for_storage(value).await?),
            None => None,
        };

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins
            SET email = $1, name = $2, role = $3, is_active = $4,
                password = COALESCE($5, password)
            WHERE id = $6
            RETURNING id, email, password, name, role, is_active, last_login_at, created_at, updated_at
            "#,
        )
        .bind(normalize_email(&input.email))
        .bind(input.name.trim())
        .bind(input.role)
        .bind(input.is_active)
        .bind(password)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update admin {}: {:?}", id, e);
            map_db_error(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Admin {} not found", id)))?;

        tracing::info!("Admin updated: id={}", admin.id);
        Ok(admin.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete admin {}: {:?}", id, e);
                map_db_error(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Admin {} not found", id)));
        }

        tracing::info!("Admin deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::admins::password::is_bcrypt_hash;

    fn new_admin(email: &str, password: &str) -> CreateAdminDto {
        CreateAdminDto {
            email: email.to_string(),
            password: password.to_string(),
            name: "Test Admin".to_string(),
            role: AdminRole::Admin,
            is_active: true,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_hashes_plain_password(pool: PgPool) {
        let service = AdminService::new(pool);
        let created = service
            .create(new_admin(" Editor@Example.com ", "plain-password"))
            .await
            .unwrap();
        assert_eq!(created.email, "editor@example.com");

        let stored = service.find_by_id(created.id).await.unwrap().unwrap();
        assert!(is_bcrypt_hash(&stored.password));
        assert!(password::verify("plain-password".to_string(), stored.password)
            .await
            .unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_without_password_keeps_hash(pool: PgPool) {
        let service = AdminService::new(pool);
        let created = service
            .create(new_admin("keep@example.com", "first-password"))
            .await
            .unwrap();
        let before = service.find_by_id(created.id).await.unwrap().unwrap();

        let updated = service
            .update(
                created.id,
                UpdateAdminDto {
                    email: "keep@example.com".to_string(),
                    password: None,
                    name: "Renamed".to_string(),
                    role: AdminRole::Moderator,
                    is_active: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.role, AdminRole::Moderator);

        let after = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(before.password, after.password);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_email_conflicts(pool: PgPool) {
        let service = AdminService::new(pool);
        service
            .create(new_admin("dup@example.com", "password-1"))
            .await
            .unwrap();
        let err = service
            .create(new_admin("DUP@example.com", "password-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_bootstrap_only_when_empty(pool: PgPool) {
        let service = AdminService::new(pool);
        let config = BootstrapAdminConfig {
            email: "root@example.com".to_string(),
            password: "bootstrap-password".to_string(),
            name: "Root".to_string(),
        };

        let created = service.ensure_bootstrap_admin(&config).await.unwrap();
        assert_eq!(created.map(|a| a.role), Some(AdminRole::SuperAdmin));
        assert!(service.ensure_bootstrap_admin(&config).await.unwrap().is_none());
        assert_eq!(service.count().await.unwrap(), 1);
    }
}
