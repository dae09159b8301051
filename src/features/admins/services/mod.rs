mod admin_service;

pub use admin_service::{AdminService, ADMIN_RESOURCE};
