//! Product categories. Managed through the admin panel only.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::CategoryService;
