use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::admins::models::{Admin, AdminRole};
use crate::shared::validation::not_blank;

fn default_true() -> bool {
    true
}

/// Admin as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponseDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponseDto {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            role: a.role,
            is_active: a.is_active,
            last_login_at: a.last_login_at,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminDto {
    #[validate(
        email(message = "email must be a valid email"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,

    /// Plain-text password, or an existing bcrypt hash which is stored as is
    #[validate(length(min = 8, max = 72, message = "password must be between 8 and 72 characters"))]
    pub password: String,

    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[serde(default)]
    pub role: AdminRole,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Full replacement of an admin; omitting `password` keeps the current one
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminDto {
    #[validate(
        email(message = "email must be a valid email"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "password must be between 8 and 72 characters"))]
    pub password: Option<String>,

    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    pub role: AdminRole,

    pub is_active: bool,
}
