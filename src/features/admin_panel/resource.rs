//! Generic admin resources.
//!
//! Each managed table implements [`AdminResource`] and describes itself with a
//! static [`ResourceMetadata`]. The metadata drives both the admin UI (it is
//! served by `GET /admin/resources`) and the whitelist of sortable and
//! filterable columns used when building list queries.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::core::error::Result;
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admins::models::AdminRole;

/// Navigation group every catalog resource is listed under
pub const CATALOG_NAVIGATION: &str = "Catalog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Integer equality (foreign keys)
    Integer,
    Boolean,
    /// Case-insensitive substring
    Text,
    /// Exact match against a closed set of values
    Choice(&'static [&'static str]),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProperty {
    pub property: &'static str,
    #[serde(skip)]
    pub column: &'static str,
    pub kind: FilterKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortProperty {
    pub property: &'static str,
    #[serde(skip)]
    pub column: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    /// URL segment under `/admin`
    pub name: &'static str,
    pub label: &'static str,
    pub navigation: &'static str,
    pub title_property: &'static str,
    /// Least privileged role allowed to manage the resource
    pub required_role: AdminRole,
    pub list_properties: &'static [&'static str],
    pub show_properties: &'static [&'static str],
    pub edit_properties: &'static [&'static str],
    pub filters: &'static [FilterProperty],
    pub sortable: &'static [SortProperty],
    #[serde(skip)]
    pub id_column: &'static str,
    #[serde(skip)]
    pub search_columns: &'static [&'static str],
    #[serde(skip)]
    pub default_sort_column: &'static str,
}

#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    type Record: Serialize + Send + 'static;
    type CreateInput: DeserializeOwned + Validate + Send + 'static;
    type UpdateInput: DeserializeOwned + Validate + Send + 'static;

    fn metadata(&self) -> &'static ResourceMetadata;

    /// One page of records plus the total number of matching rows
    async fn list(&self, params: &AdminListParams) -> Result<(Vec<Self::Record>, i64)>;

    async fn find(&self, id: i32) -> Result<Self::Record>;

    async fn create(&self, input: Self::CreateInput) -> Result<Self::Record>;

    async fn update(&self, id: i32, input: Self::UpdateInput) -> Result<Self::Record>;

    async fn delete(&self, id: i32) -> Result<()>;
}
