use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
    pub category_id: i32,
    pub manufacturer_id: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Gallery images (`image1`..`image4`) that are set, in order
    pub fn additional_images(&self) -> Vec<String> {
        [&self.image1, &self.image2, &self.image3, &self.image4]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Preview image followed by the gallery images, skipping unset ones
    pub fn images(&self) -> Vec<String> {
        self.preview_image
            .iter()
            .cloned()
            .chain(self.additional_images())
            .collect()
    }
}

/// Product row joined with its category and manufacturer
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithRelations {
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: String,
    pub manufacturer_name: String,
    pub manufacturer_country: Option<String>,
    pub manufacturer_website: Option<String>,
    pub manufacturer_description: Option<String>,
}
