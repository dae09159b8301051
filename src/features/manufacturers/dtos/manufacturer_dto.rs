use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::manufacturers::models::Manufacturer;
use crate::shared::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerResponseDto {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Manufacturer> for ManufacturerResponseDto {
    fn from(m: Manufacturer) -> Self {
        Self {
            id: m.id,
            name: m.name,
            country: m.country,
            website: m.website,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body of create and update requests; omitted optional fields are stored as NULL
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ManufacturerInputDto {
    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(length(max = 100, message = "country must be at most 100 characters"))]
    pub country: Option<String>,

    #[validate(
        url(message = "website must be a valid URL"),
        length(max = 500, message = "website must be at most 500 characters")
    )]
    pub website: Option<String>,

    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ManufacturerInputDto {
        ManufacturerInputDto {
            name: "Sweet Factory".to_string(),
            country: Some("Belgium".to_string()),
            website: Some("https://sweets.example.com".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
        let minimal = ManufacturerInputDto {
            country: None,
            website: None,
            ..input()
        };
        assert!(minimal.validate().is_ok());
    }

    #[test]
    fn test_invalid_website_and_country() {
        let dto = ManufacturerInputDto {
            website: Some("not a url".to_string()),
            country: Some("x".repeat(101)),
            ..input()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
        assert!(errors.field_errors().contains_key("country"));
    }
}
