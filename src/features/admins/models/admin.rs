use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Admin role, ordered by privilege
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Moderator,
    #[default]
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
            AdminRole::Moderator => "moderator",
        }
    }

    /// True when this role is at least as privileged as `required`
    pub fn grants(&self, required: AdminRole) -> bool {
        *self >= required
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for an admin account
#[derive(Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Admin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("last_login_at", &self.last_login_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(AdminRole::SuperAdmin.grants(AdminRole::Admin));
        assert!(AdminRole::Admin.grants(AdminRole::Moderator));
        assert!(AdminRole::Moderator.grants(AdminRole::Moderator));
        assert!(!AdminRole::Admin.grants(AdminRole::SuperAdmin));
        assert!(!AdminRole::Moderator.grants(AdminRole::Admin));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_value(AdminRole::SuperAdmin).unwrap(),
            serde_json::json!("super_admin")
        );
        let role: AdminRole = serde_json::from_value(serde_json::json!("moderator")).unwrap();
        assert_eq!(role, AdminRole::Moderator);
        assert!(serde_json::from_value::<AdminRole>(serde_json::json!("root")).is_err());
        assert_eq!(AdminRole::default(), AdminRole::Admin);
    }

    #[test]
    fn test_debug_redacts_password() {
        let now = Utc::now();
        let admin = Admin {
            id: 1,
            email: "a@example.com".to_string(),
            password: "$2b$12$secret".to_string(),
            name: "A".to_string(),
            role: AdminRole::Admin,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let debug = format!("{:?}", admin);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
