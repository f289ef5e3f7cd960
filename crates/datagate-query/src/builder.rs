//! The query builder: deterministic translation of a validated request
//! into one parameterized statement.

use crate::error::QueryError;
use crate::request::{DateRangeClause, FilterClause, SortSpec, TableIdentity};
use crate::statement::ParameterizedQuery;
use crate::value::{ScalarValue, coerce_value};
use datagate_catalog::{ColumnType, SchemaCatalog};
use datagate_core::TableAllowList;
use std::collections::BTreeMap;

/// Parameter name bound to the date range lower bound.
const FROM_DATE_PARAM: &str = "fromDate";
/// Parameter name bound to the date range upper bound.
const TO_DATE_PARAM: &str = "toDate";

/// Builds parameterized SELECT statements against allow-listed tables.
///
/// The allow-list is injected at construction so the builder can be
/// exercised under multiple configurations; the catalog provides the
/// authoritative column metadata.
pub struct QueryBuilder<'a> {
    allow_list: &'a TableAllowList,
    catalog: &'a dyn SchemaCatalog,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(allow_list: &'a TableAllowList, catalog: &'a dyn SchemaCatalog) -> Self {
        Self {
            allow_list,
            catalog,
        }
    }

    /// Build one statement from the request parts.
    ///
    /// Failure policy per clause type (deliberately divergent, see
    /// DESIGN.md):
    /// - unknown/disallowed target: hard fail
    /// - unknown date-range column: hard fail
    /// - unknown filter column: warn and drop that filter
    /// - unknown sort column: silently omit the ORDER BY
    /// - any value failing coercion: hard fail
    pub async fn build(
        &self,
        identity: &TableIdentity,
        filters: &[FilterClause],
        date_range: Option<&DateRangeClause>,
        sort: Option<&SortSpec>,
    ) -> Result<ParameterizedQuery, QueryError> {
        let invalid_target = || QueryError::InvalidTarget {
            schema: identity.schema.clone(),
            table: identity.table.clone(),
        };

        // The allow-list gate comes first: even an existing table the
        // operator never listed must not reach the catalog.
        if !self.allow_list.contains(&identity.schema, &identity.table) {
            return Err(invalid_target());
        }
        if !valid_ident(&identity.schema) || !valid_ident(&identity.table) {
            return Err(invalid_target());
        }
        if !self
            .catalog
            .table_exists(&identity.schema, &identity.table)
            .await?
        {
            return Err(invalid_target());
        }

        // The unconditional 1=1 lets every later clause append as "AND ...".
        let mut sql = format!(
            "SELECT * FROM {}.{} WHERE 1=1",
            quote_ident(&identity.schema),
            quote_ident(&identity.table)
        );
        let mut params: BTreeMap<String, ScalarValue> = BTreeMap::new();

        if let Some(range) = date_range {
            self.append_date_range(identity, range, &mut sql, &mut params)
                .await?;
        }

        for filter in filters {
            self.append_filter(identity, filter, &mut sql, &mut params)
                .await?;
        }

        if let Some(sort) = sort {
            self.append_sort(identity, sort, &mut sql).await?;
        }

        tracing::debug!(sql = %sql, params = ?params, "built query");

        Ok(ParameterizedQuery { text: sql, params })
    }

    async fn append_date_range(
        &self,
        identity: &TableIdentity,
        range: &DateRangeClause,
        sql: &mut String,
        params: &mut BTreeMap<String, ScalarValue>,
    ) -> Result<(), QueryError> {
        if !valid_ident(&range.column)
            || !self
                .catalog
                .column_exists(&identity.schema, &identity.table, &range.column)
                .await?
        {
            return Err(QueryError::InvalidColumn {
                schema: identity.schema.clone(),
                table: identity.table.clone(),
                column: range.column.clone(),
            });
        }

        let column = quote_ident(&range.column);
        if let Some(from) = &range.from {
            let value = coerce_value(from, ColumnType::Timestamp)?;
            sql.push_str(&format!(" AND {} > :{}", column, FROM_DATE_PARAM));
            params.insert(FROM_DATE_PARAM.to_string(), value);
        }
        if let Some(to) = &range.to {
            let value = coerce_value(to, ColumnType::Timestamp)?;
            sql.push_str(&format!(" AND {} < :{}", column, TO_DATE_PARAM));
            params.insert(TO_DATE_PARAM.to_string(), value);
        }

        Ok(())
    }

    async fn append_filter(
        &self,
        identity: &TableIdentity,
        filter: &FilterClause,
        sql: &mut String,
        params: &mut BTreeMap<String, ScalarValue>,
    ) -> Result<(), QueryError> {
        if !valid_ident(&filter.column)
            || !self
                .catalog
                .column_exists(&identity.schema, &identity.table, &filter.column)
                .await?
        {
            // One bad filter degrades gracefully instead of failing the
            // whole request.
            tracing::warn!(
                schema = %identity.schema,
                table = %identity.table,
                column = %filter.column,
                "ignoring filter on unknown column"
            );
            return Ok(());
        }

        let declared = self
            .catalog
            .column_type(&identity.schema, &identity.table, &filter.column)
            .await?;
        let (operator, raw_value) = infer_operator(&filter.raw_value, declared);
        let value = coerce_value(raw_value, declared)?;

        sql.push_str(&format!(
            " AND {} {} :{}",
            quote_ident(&filter.column),
            operator,
            filter.column
        ));
        // Parameter name equals the column name; a repeated column
        // collides and the last occurrence wins.
        params.insert(filter.column.clone(), value);

        Ok(())
    }

    async fn append_sort(
        &self,
        identity: &TableIdentity,
        sort: &SortSpec,
        sql: &mut String,
    ) -> Result<(), QueryError> {
        if valid_ident(&sort.column)
            && self
                .catalog
                .column_exists(&identity.schema, &identity.table, &sort.column)
                .await?
        {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_ident(&sort.column),
                sort.direction.as_sql()
            ));
        }
        Ok(())
    }
}

/// Pick the comparison operator for a filter value.
///
/// Textual columns get `LIKE` when the value carries a wildcard and never
/// the `>`/`<` shorthand; non-textual columns starting with `>` or `<`
/// use that operator with the prefix stripped and the remainder trimmed.
fn infer_operator(raw: &str, declared: ColumnType) -> (&'static str, &str) {
    if declared.is_textual() {
        if raw.contains('%') {
            return ("LIKE", raw);
        }
        return ("=", raw);
    }
    if let Some(rest) = raw.strip_prefix('>') {
        return (">", rest.trim());
    }
    if let Some(rest) = raw.strip_prefix('<') {
        return ("<", rest.trim());
    }
    ("=", raw)
}

/// Identifiers are only ever inlined after passing this check; Postgres
/// cannot bind them as parameters.
fn valid_ident(ident: &str) -> bool {
    !ident.is_empty() && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{SortDirection, SortSpec};
    use crate::value::ScalarValue;
    use chrono::NaiveDate;
    use datagate_catalog::StaticCatalog;
    use datagate_core::{AllowedTable, TableAllowList};

    fn allow_list() -> TableAllowList {
        TableAllowList::new(vec![
            AllowedTable {
                schema: "mdm_internal".to_string(),
                table: "location_master_raw_tb".to_string(),
            },
            AllowedTable {
                schema: "mdm_internal".to_string(),
                table: "ghost_tb".to_string(),
            },
        ])
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new().with_table(
            "mdm_internal",
            "location_master_raw_tb",
            &[
                ("location_code", ColumnType::Text),
                ("location_name", ColumnType::Text),
                ("is_active", ColumnType::Boolean),
                ("region_id", ColumnType::Integer),
                ("capacity", ColumnType::Float),
                ("load_timestamp", ColumnType::Timestamp),
                ("valid_from", ColumnType::Date),
            ],
        )
    }

    fn identity() -> TableIdentity {
        TableIdentity::new("mdm_internal", "location_master_raw_tb")
    }

    async fn build(
        filters: &[FilterClause],
        date_range: Option<&DateRangeClause>,
        sort: Option<&SortSpec>,
    ) -> Result<ParameterizedQuery, QueryError> {
        let allow = allow_list();
        let catalog = catalog();
        QueryBuilder::new(&allow, &catalog)
            .build(&identity(), filters, date_range, sort)
            .await
    }

    #[tokio::test]
    async fn test_bare_request_selects_everything() {
        let q = build(&[], None, None).await.unwrap();
        assert_eq!(
            q.text,
            r#"SELECT * FROM "mdm_internal"."location_master_raw_tb" WHERE 1=1"#
        );
        assert!(q.params.is_empty());
    }

    #[tokio::test]
    async fn test_table_outside_allow_list_rejected_before_catalog() {
        let allow = allow_list();
        let catalog = catalog();
        let builder = QueryBuilder::new(&allow, &catalog);
        let result = builder
            .build(
                &TableIdentity::new("mdm_internal", "secrets_tb"),
                &[FilterClause::new("is_active", "true")],
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(QueryError::InvalidTarget { .. })));
        // The allow-list gate must fire before any metadata lookup.
        assert_eq!(catalog.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_allow_listed_but_nonexistent_table_rejected() {
        // ghost_tb is allow-listed but the catalog has never heard of it;
        // the existence gate closes the gap.
        let allow = allow_list();
        let catalog = catalog();
        let result = QueryBuilder::new(&allow, &catalog)
            .build(
                &TableIdentity::new("mdm_internal", "ghost_tb"),
                &[],
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(QueryError::InvalidTarget { .. })));
    }

    #[tokio::test]
    async fn test_boolean_filter_with_sort() {
        let q = build(
            &[FilterClause::new("is_active", "true")],
            None,
            Some(&SortSpec {
                column: "location_code".to_string(),
                direction: SortDirection::Desc,
            }),
        )
        .await
        .unwrap();

        assert!(q.text.contains(r#"AND "is_active" = :is_active"#));
        assert!(q.text.ends_with(r#"ORDER BY "location_code" DESC"#));
        assert_eq!(q.params.get("is_active"), Some(&ScalarValue::Bool(true)));
    }

    #[tokio::test]
    async fn test_unknown_filter_column_dropped_not_fatal() {
        let q = build(
            &[
                FilterClause::new("foo", "bar"),
                FilterClause::new("is_active", "true"),
            ],
            None,
            None,
        )
        .await
        .unwrap();

        assert!(!q.text.contains("foo"));
        assert!(q.text.contains(r#""is_active""#));
        assert!(!q.params.contains_key("foo"));
    }

    #[tokio::test]
    async fn test_textual_wildcard_uses_like() {
        let q = build(&[FilterClause::new("location_code", "LOC-%")], None, None)
            .await
            .unwrap();
        assert!(q.text.contains(r#""location_code" LIKE :location_code"#));
        assert_eq!(
            q.params.get("location_code"),
            Some(&ScalarValue::Text("LOC-%".to_string()))
        );
    }

    #[tokio::test]
    async fn test_textual_wildcard_beats_prefix_operator() {
        // A textual value that both starts with '>' and contains '%'
        // must take the LIKE path with the value untouched.
        let q = build(&[FilterClause::new("location_code", ">LOC-%")], None, None)
            .await
            .unwrap();
        assert!(q.text.contains(r#""location_code" LIKE :location_code"#));
        assert_eq!(
            q.params.get("location_code"),
            Some(&ScalarValue::Text(">LOC-%".to_string()))
        );
    }

    #[tokio::test]
    async fn test_textual_prefix_without_wildcard_stays_equality() {
        let q = build(&[FilterClause::new("location_name", ">depot")], None, None)
            .await
            .unwrap();
        assert!(q.text.contains(r#""location_name" = :location_name"#));
        assert_eq!(
            q.params.get("location_name"),
            Some(&ScalarValue::Text(">depot".to_string()))
        );
    }

    #[tokio::test]
    async fn test_numeric_prefix_operators_stripped_and_trimmed() {
        let q = build(
            &[
                FilterClause::new("region_id", "> 10"),
                FilterClause::new("capacity", "<2.5"),
            ],
            None,
            None,
        )
        .await
        .unwrap();

        assert!(q.text.contains(r#""region_id" > :region_id"#));
        assert!(q.text.contains(r#""capacity" < :capacity"#));
        assert_eq!(q.params.get("region_id"), Some(&ScalarValue::Int(10)));
        assert_eq!(q.params.get("capacity"), Some(&ScalarValue::Float(2.5)));
    }

    #[tokio::test]
    async fn test_bad_filter_value_aborts_request() {
        let result = build(&[FilterClause::new("region_id", "ten")], None, None).await;
        assert!(matches!(result, Err(QueryError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_date_range_from_and_to() {
        let range = DateRangeClause {
            column: "load_timestamp".to_string(),
            from: Some("2024-01-01 00:00:00".to_string()),
            to: Some("2024-02-01 00:00:00".to_string()),
        };
        let q = build(&[], Some(&range), None).await.unwrap();

        assert!(q.text.contains(r#""load_timestamp" > :fromDate"#));
        assert!(q.text.contains(r#""load_timestamp" < :toDate"#));
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            q.params.get("fromDate"),
            Some(&ScalarValue::Timestamp(expected))
        );
    }

    #[tokio::test]
    async fn test_date_range_bounds_are_independently_optional() {
        let range = DateRangeClause {
            column: "load_timestamp".to_string(),
            from: Some("2024-01-01 00:00:00".to_string()),
            to: None,
        };
        let q = build(&[], Some(&range), None).await.unwrap();
        assert!(q.text.contains(":fromDate"));
        assert!(!q.text.contains(":toDate"));
    }

    #[tokio::test]
    async fn test_malformed_from_date_aborts() {
        let range = DateRangeClause {
            column: "load_timestamp".to_string(),
            from: Some("not-a-date".to_string()),
            to: None,
        };
        let result = build(&[], Some(&range), None).await;
        assert!(matches!(result, Err(QueryError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_unknown_date_column_is_fatal() {
        // Unlike filters, a bad date column aborts the whole request.
        let range = DateRangeClause {
            column: "nope".to_string(),
            from: Some("2024-01-01 00:00:00".to_string()),
            to: None,
        };
        let result = build(&[], Some(&range), None).await;
        assert!(matches!(result, Err(QueryError::InvalidColumn { .. })));
    }

    #[tokio::test]
    async fn test_unknown_sort_column_silently_ignored() {
        let q = build(
            &[],
            None,
            Some(&SortSpec {
                column: "nope".to_string(),
                direction: SortDirection::Asc,
            }),
        )
        .await
        .unwrap();
        assert!(!q.text.contains("ORDER BY"));
    }

    #[tokio::test]
    async fn test_sort_defaults_to_asc() {
        let q = build(
            &[],
            None,
            Some(&SortSpec {
                column: "location_code".to_string(),
                direction: SortDirection::parse(Some("upside-down")),
            }),
        )
        .await
        .unwrap();
        assert!(q.text.ends_with(r#"ORDER BY "location_code" ASC"#));
    }

    #[tokio::test]
    async fn test_malicious_column_name_cannot_reach_sql() {
        // Not a valid identifier, so it is dropped before any quoting.
        let q = build(
            &[FilterClause::new("is_active\" OR \"1\"=\"1", "true")],
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(
            q.text,
            r#"SELECT * FROM "mdm_internal"."location_master_raw_tb" WHERE 1=1"#
        );
    }

    #[test]
    fn test_infer_operator_table() {
        assert_eq!(infer_operator("abc", ColumnType::Text), ("=", "abc"));
        assert_eq!(infer_operator("a%c", ColumnType::Text), ("LIKE", "a%c"));
        assert_eq!(infer_operator(">5", ColumnType::Integer), (">", "5"));
        assert_eq!(infer_operator("< 5 ", ColumnType::Integer), ("<", "5"));
        assert_eq!(infer_operator("5", ColumnType::Integer), ("=", "5"));
        // Timestamp columns take the prefix path too.
        assert_eq!(
            infer_operator(">2024-01-01 00:00:00", ColumnType::Timestamp),
            (">", "2024-01-01 00:00:00")
        );
    }
}
