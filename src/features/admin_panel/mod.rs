//! JSON admin panel over the catalog tables.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/admin/login` | No | Start a session |
//! | POST | `/admin/logout` | No | Clear the session cookie |
//! | GET | `/admin/me` | Session | Current admin |
//! | GET | `/admin/resources` | Session | Resources visible to the current admin |
//! | GET, POST | `/admin/{resource}` | Session | List / create |
//! | GET, PUT, DELETE | `/admin/{resource}/{id}` | Session | Show / replace / delete |

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod query;
pub mod resource;
pub mod routes;
pub mod services;
pub mod session;

pub use services::AdminAuthService;
pub use session::SessionManager;
