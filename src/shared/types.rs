use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<FieldError>>,
}

/// Pagination metadata attached to admin list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl Meta {
    pub fn paged(total: i64, page: i64, per_page: i64) -> Self {
        Self {
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        }
    }
}

/// One validation problem; `field` is absent for request-wide errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

// =============================================================================
// SORTING & PAGINATION
// =============================================================================

/// Sort direction, spelled `ASC` / `DESC` on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const ALLOWED: [(&'static str, SortDirection); 2] =
        [("ASC", SortDirection::Asc), ("DESC", SortDirection::Desc)];

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `ceil(total / per_page)`; zero rows means zero pages
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 || total <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<FieldError>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 1), 100);
    }

    #[test]
    fn test_meta_paged() {
        let meta = Meta::paged(45, 2, 10);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.page, 2);
    }

    #[test]
    fn test_general_field_error_omits_field() {
        let json = serde_json::to_value(FieldError::general("boom")).unwrap();
        assert!(json.get("field").is_none());
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn test_sort_direction_wire_format() {
        assert_eq!(
            serde_json::to_value(SortDirection::Desc).unwrap(),
            serde_json::json!("DESC")
        );
        assert_eq!(SortDirection::default().as_sql(), "ASC");
    }
}
