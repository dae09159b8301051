mod admin_auth_service;

pub use admin_auth_service::AdminAuthService;
