use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::admin_panel::dtos::LoginRequestDto;
use crate::features::admin_panel::model::AuthenticatedAdmin;
use crate::features::admin_panel::session::SessionManager;
use crate::features::admins::dtos::AdminResponseDto;
use crate::features::admins::password;
use crate::features::admins::AdminService;

/// Login and per-request session checks against the `admins` table
pub struct AdminAuthService {
    admins: Arc<AdminService>,
    sessions: SessionManager,
}

impl AdminAuthService {
    pub fn new(admins: Arc<AdminService>, sessions: SessionManager) -> Self {
        Self { admins, sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Verify credentials of an active admin and open a session.
    ///
    /// Returns the admin and the signed session token.
    pub async fn login(&self, dto: &LoginRequestDto) -> Result<(AdminResponseDto, String)> {
        let admin = self
            .admins
            .find_by_email(&dto.email)
            .await?
            .filter(|a| a.is_active);

        let Some(admin) = admin else {
            tracing::info!("Admin login rejected: unknown or inactive account");
            return Err(invalid_credentials());
        };

        if !password::verify(dto.password.clone(), admin.password.clone()).await? {
            tracing::info!("Admin login rejected: wrong password for id={}", admin.id);
            return Err(invalid_credentials());
        }

        let admin = self.admins.record_login(admin.id).await?;
        let token = self.sessions.issue(admin.id)?;

        tracing::info!("Admin logged in: id={}, role={}", admin.id, admin.role);
        Ok((admin.into(), token))
    }

    /// Resolve a session token to an admin that still exists and is active
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedAdmin> {
        let admin_id = self.sessions.verify(token)?;

        let admin = self
            .admins
            .find_by_id(admin_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| {
                AppError::Unauthorized("Admin account is missing or disabled".to_string())
            })?;

        Ok(AuthenticatedAdmin::from(&admin))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}
