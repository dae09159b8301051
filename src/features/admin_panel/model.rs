use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::admins::models::{Admin, AdminRole};

/// Admin resolved from the session cookie, attached to the request by
/// `admin_session_middleware`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedAdmin {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl From<&Admin> for AuthenticatedAdmin {
    fn from(a: &Admin) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            name: a.name.clone(),
            role: a.role,
        }
    }
}
