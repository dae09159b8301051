//! Products: the public catalog API and the admin resource.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/products` | No | Paginated, filtered, sorted list of active products |
//! | GET | `/api/products/{id}` | No | One active product with its category and manufacturer |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;

pub use services::ProductService;
