//! CRUD handlers shared by every [`AdminResource`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::admin_panel::model::AuthenticatedAdmin;
use crate::features::admin_panel::query::AdminListParams;
use crate::features::admin_panel::resource::AdminResource;
use crate::shared::query::{parse_id, single_valued};
use crate::shared::types::{ApiResponse, Meta};

fn ensure_access<R: AdminResource>(admin: &AuthenticatedAdmin, resource: &R) -> Result<()> {
    let required = resource.metadata().required_role;
    if admin.role.grants(required) {
        Ok(())
    } else {
        tracing::warn!(
            "Admin {} ({}) denied access to {}",
            admin.id,
            admin.role,
            resource.metadata().name
        );
        Err(AppError::Forbidden(format!(
            "Role {} is required to manage {}",
            required,
            resource.metadata().name
        )))
    }
}

pub async fn list_records<R: AdminResource>(
    admin: AuthenticatedAdmin,
    State(resource): State<Arc<R>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<R::Record>>>> {
    ensure_access(&admin, resource.as_ref())?;

    let params = single_valued(pairs).map_err(AppError::Validation)?;
    let params =
        AdminListParams::from_params(&params, resource.metadata()).map_err(AppError::Validation)?;
    let (records, total) = resource.list(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(records),
        None,
        Some(Meta::paged(total, params.page, params.per_page)),
    )))
}

pub async fn show_record<R: AdminResource>(
    admin: AuthenticatedAdmin,
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<R::Record>>> {
    ensure_access(&admin, resource.as_ref())?;

    let record = resource.find(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

pub async fn create_record<R: AdminResource>(
    admin: AuthenticatedAdmin,
    State(resource): State<Arc<R>>,
    AppJson(input): AppJson<R::CreateInput>,
) -> Result<(StatusCode, Json<ApiResponse<R::Record>>)> {
    ensure_access(&admin, resource.as_ref())?;
    input.validate()?;

    let record = resource.create(input).await?;
    tracing::info!(
        "Admin {} created a record in {}",
        admin.id,
        resource.metadata().name
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record),
            Some("Created".to_string()),
            None,
        )),
    ))
}

pub async fn update_record<R: AdminResource>(
    admin: AuthenticatedAdmin,
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
    AppJson(input): AppJson<R::UpdateInput>,
) -> Result<Json<ApiResponse<R::Record>>> {
    ensure_access(&admin, resource.as_ref())?;
    let id = parse_id(&id)?;
    input.validate()?;

    let record = resource.update(id, input).await?;
    tracing::info!(
        "Admin {} updated {} {}",
        admin.id,
        resource.metadata().name,
        id
    );

    Ok(Json(ApiResponse::success(
        Some(record),
        Some("Updated".to_string()),
        None,
    )))
}

pub async fn delete_record<R: AdminResource>(
    admin: AuthenticatedAdmin,
    State(resource): State<Arc<R>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    ensure_access(&admin, resource.as_ref())?;
    let id = parse_id(&id)?;

    resource.delete(id).await?;
    tracing::info!(
        "Admin {} deleted {} {}",
        admin.id,
        resource.metadata().name,
        id
    );

    Ok(Json(ApiResponse::success(
        None,
        Some("Deleted".to_string()),
        None,
    )))
}
