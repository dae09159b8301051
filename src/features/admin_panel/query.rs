use std::collections::HashMap;

use sqlx::{Postgres, QueryBuilder};

use crate::features::admin_panel::resource::{FilterKind, ResourceMetadata};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SEARCH_LENGTH};
use crate::shared::query::{contains_pattern, ParamReader};
use crate::shared::types::{FieldError, SortDirection};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Boolean(bool),
    Contains(String),
    Equals(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    pub column: &'static str,
    pub value: FilterValue,
}

/// Validated admin list request: `page`, `perPage`, `search`, `sortBy`,
/// `direction` and one parameter per filter the resource declares
#[derive(Debug, Clone)]
pub struct AdminListParams {
    pub page: i64,
    pub per_page: i64,
    pub search: Option<String>,
    pub sort_column: &'static str,
    pub direction: SortDirection,
    pub filters: Vec<ColumnFilter>,
    id_column: &'static str,
    search_columns: &'static [&'static str],
}

impl AdminListParams {
    pub fn from_params(
        params: &HashMap<String, String>,
        metadata: &'static ResourceMetadata,
    ) -> Result<Self, Vec<FieldError>> {
        let mut reader = ParamReader::new(params);

        let page = reader.int("page", 1, i64::from(i32::MAX)).unwrap_or(1);
        let per_page = reader
            .int("perPage", 1, MAX_PAGE_SIZE)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let search = reader.text("search", MAX_SEARCH_LENGTH);

        let sort_choices: Vec<(&str, &'static str)> = metadata
            .sortable
            .iter()
            .map(|s| (s.property, s.column))
            .collect();
        let sort_column = reader
            .one_of("sortBy", &sort_choices)
            .unwrap_or(metadata.default_sort_column);
        let direction = reader
            .one_of("direction", &SortDirection::ALLOWED)
            .unwrap_or_default();

        let mut filters = Vec::new();
        for filter in metadata.filters {
            let value = match filter.kind {
                FilterKind::Integer => reader
                    .int(filter.property, 1, i64::from(i32::MAX))
                    .map(FilterValue::Integer),
                FilterKind::Boolean => reader.boolean(filter.property).map(FilterValue::Boolean),
                FilterKind::Text => reader
                    .text(filter.property, MAX_SEARCH_LENGTH)
                    .map(FilterValue::Contains),
                FilterKind::Choice(values) => {
                    let choices: Vec<(&str, &'static str)> =
                        values.iter().map(|v| (*v, *v)).collect();
                    reader
                        .one_of(filter.property, &choices)
                        .map(|v| FilterValue::Equals(v.to_string()))
                }
            };
            if let Some(value) = value {
                filters.push(ColumnFilter {
                    column: filter.column,
                    value,
                });
            }
        }

        reader.finish()?;

        Ok(Self {
            page,
            per_page,
            search,
            sort_column,
            direction,
            filters,
            id_column: metadata.id_column,
            search_columns: metadata.search_columns,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Append the WHERE clause shared by the page and count queries
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");

        for filter in &self.filters {
            qb.push(" AND ").push(filter.column);
            match &filter.value {
                FilterValue::Integer(v) => {
                    qb.push(" = ").push_bind(*v);
                }
                FilterValue::Boolean(v) => {
                    qb.push(" = ").push_bind(*v);
                }
                FilterValue::Contains(v) => {
                    qb.push(" ILIKE ").push_bind(contains_pattern(v));
                }
                FilterValue::Equals(v) => {
                    qb.push(" = ").push_bind(v.clone());
                }
            }
        }

        if let Some(search) = &self.search {
            if !self.search_columns.is_empty() {
                let pattern = contains_pattern(search);
                qb.push(" AND (");
                for (i, column) in self.search_columns.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
                }
                qb.push(")");
            }
        }
    }

    /// Append ORDER BY (with the id tiebreak) and LIMIT/OFFSET
    pub fn push_order_and_page(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ")
            .push(self.sort_column)
            .push(" ")
            .push(self.direction.as_sql());
        if self.sort_column != self.id_column {
            qb.push(", ").push(self.id_column).push(" ASC");
        }
        qb.push(" LIMIT ")
            .push_bind(self.per_page)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::admin_panel::resource::{FilterProperty, SortProperty};
    use crate::features::admins::models::AdminRole;

    static TEST_RESOURCE: ResourceMetadata = ResourceMetadata {
        name: "widgets",
        label: "Widgets",
        navigation: "Catalog",
        title_property: "name",
        required_role: AdminRole::Moderator,
        list_properties: &["id", "name"],
        show_properties: &["id", "name"],
        edit_properties: &["name"],
        filters: &[
            FilterProperty {
                property: "ownerId",
                column: "w.owner_id",
                kind: FilterKind::Integer,
            },
            FilterProperty {
                property: "isActive",
                column: "w.is_active",
                kind: FilterKind::Boolean,
            },
            FilterProperty {
                property: "kind",
                column: "w.kind::text",
                kind: FilterKind::Choice(&["small", "large"]),
            },
        ],
        sortable: &[
            SortProperty {
                property: "id",
                column: "w.id",
            },
            SortProperty {
                property: "name",
                column: "w.name",
            },
        ],
        id_column: "w.id",
        search_columns: &["w.name", "w.code"],
        default_sort_column: "w.id",
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build_sql(list: &AdminListParams) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT w.* FROM widgets w");
        list.push_conditions(&mut qb);
        list.push_order_and_page(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_defaults() {
        let list = AdminListParams::from_params(&params(&[]), &TEST_RESOURCE).unwrap();
        assert_eq!(list.page, 1);
        assert_eq!(list.per_page, DEFAULT_PAGE_SIZE);
        assert_eq!(list.offset(), 0);
        assert_eq!(
            build_sql(&list),
            "SELECT w.* FROM widgets w WHERE TRUE ORDER BY w.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_filters_search_and_sort() {
        let list = AdminListParams::from_params(
            &params(&[
                ("page", "3"),
                ("perPage", "25"),
                ("search", "choc"),
                ("sortBy", "name"),
                ("direction", "DESC"),
                ("ownerId", "4"),
                ("isActive", "false"),
                ("kind", "large"),
            ]),
            &TEST_RESOURCE,
        )
        .unwrap();
        assert_eq!(list.offset(), 50);
        assert_eq!(
            list.filters,
            vec![
                ColumnFilter {
                    column: "w.owner_id",
                    value: FilterValue::Integer(4)
                },
                ColumnFilter {
                    column: "w.is_active",
                    value: FilterValue::Boolean(false)
                },
                ColumnFilter {
                    column: "w.kind::text",
                    value: FilterValue::Equals("large".to_string())
                },
            ]
        );
        assert_eq!(
            build_sql(&list),
            "SELECT w.* FROM widgets w WHERE TRUE AND w.owner_id = $1 AND w.is_active = $2 \
             AND w.kind::text = $3 AND (w.name ILIKE $4 OR w.code ILIKE $5) \
             ORDER BY w.name DESC, w.id ASC LIMIT $6 OFFSET $7"
        );
    }

    #[test]
    fn test_invalid_params_are_all_reported() {
        let errors = AdminListParams::from_params(
            &params(&[
                ("perPage", "500"),
                ("sortBy", "password"),
                ("kind", "medium"),
                ("extra", "1"),
            ]),
            &TEST_RESOURCE,
        )
        .unwrap_err();
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.clone()).collect();
        assert_eq!(fields, vec!["perPage", "sortBy", "kind", "extra"]);
    }
}
