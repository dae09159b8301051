use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin_panel::dtos::LoginRequestDto;
use crate::features::admin_panel::model::AuthenticatedAdmin;
use crate::features::admin_panel::resource::ResourceMetadata;
use crate::features::admin_panel::routes::registered_resources;
use crate::features::admin_panel::services::AdminAuthService;
use crate::features::admins::dtos::AdminResponseDto;
use crate::shared::types::ApiResponse;

/// Log in to the admin panel
///
/// On success the session cookie is set and the admin is returned.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = ApiResponse<AdminResponseDto>),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "admin"
)]
pub async fn login(
    State(auth): State<Arc<AdminAuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<impl IntoResponse> {
    dto.validate()?;

    let (admin, token) = auth.login(&dto).await?;
    let cookie = auth.sessions().session_cookie(&token)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(
            Some(admin),
            Some("Logged in".to_string()),
            None,
        )),
    ))
}

/// Log out of the admin panel
#[utoipa::path(
    post,
    path = "/admin/logout",
    responses(
        (status = 200, description = "Session cookie cleared")
    ),
    tag = "admin"
)]
pub async fn logout(State(auth): State<Arc<AdminAuthService>>) -> Result<impl IntoResponse> {
    let cookie = auth.sessions().clear_cookie()?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::<()>::success(
            None,
            Some("Logged out".to_string()),
            None,
        )),
    ))
}

/// Current admin
#[utoipa::path(
    get,
    path = "/admin/me",
    responses(
        (status = 200, description = "Current admin", body = ApiResponse<AuthenticatedAdmin>),
        (status = 401, description = "No valid session")
    ),
    security(("admin_session" = [])),
    tag = "admin"
)]
pub async fn me(admin: AuthenticatedAdmin) -> Json<ApiResponse<AuthenticatedAdmin>> {
    Json(ApiResponse::success(Some(admin), None, None))
}

/// Resources the current admin may manage
pub async fn list_resources(
    admin: AuthenticatedAdmin,
) -> Json<ApiResponse<Vec<&'static ResourceMetadata>>> {
    let resources = registered_resources()
        .into_iter()
        .filter(|r| admin.role.grants(r.required_role))
        .collect();

    Json(ApiResponse::success(Some(resources), None, None))
}
