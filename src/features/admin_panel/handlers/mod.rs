mod auth_handler;
mod resource_handler;

pub use auth_handler::*;
pub use resource_handler::*;
