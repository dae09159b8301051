use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for manufacturer
#[derive(Debug, Clone, FromRow)]
pub struct Manufacturer {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
