//! Admin accounts: the `admins` table, password hashing and the
//! bootstrap super admin created on first start.

pub mod dtos;
pub mod models;
pub mod password;
pub mod services;

pub use services::AdminService;
