mod product;

pub use product::{Product, ProductWithRelations};
