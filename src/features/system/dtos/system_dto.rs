use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// Name, version and the endpoint map of the public API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoDto {
    pub name: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Entry points listed at `/`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootInfoDto {
    pub name: String,
    pub version: String,
    pub admin: String,
    pub api: String,
    pub health: String,
    pub docs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotFoundDto {
    pub path: String,
}
