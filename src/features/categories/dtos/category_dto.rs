use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::validation::not_blank;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Body of create and update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryInputDto {
    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        let ok = CategoryInputDto {
            name: "Chocolate".to_string(),
        };
        assert!(ok.validate().is_ok());

        for name in ["".to_string(), "  ".to_string(), "x".repeat(256)] {
            assert!(CategoryInputDto { name }.validate().is_err());
        }
    }
}
