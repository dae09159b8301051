pub mod admin_panel;
pub mod admins;
pub mod categories;
pub mod manufacturers;
pub mod products;
pub mod system;
