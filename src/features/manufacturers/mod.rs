//! Manufacturers. Managed through the admin panel, embedded in public
//! product responses.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::ManufacturerService;
