//! Health check, API info and the JSON 404 fallback.

pub mod dtos;
pub mod handlers;
pub mod routes;
