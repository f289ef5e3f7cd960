//! Router and request handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use datagate_query::{
    DateRangeClause, FilterClause, QueryBuilder, SortDirection, SortSpec, TableIdentity,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/data/{schema}/{table}", get(fetch_data))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "datagate" }))
}

/// `GET /api/data/{schema}/{table}`
///
/// Reserved query parameters (`dateColumn`, `fromDate`, `toDate`,
/// `sortBy`, `sortOrder`) shape the date range and sort; every other
/// parameter is treated as a column filter.
async fn fetch_data(
    State(state): State<Arc<AppState>>,
    Path((schema, table)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let identity = TableIdentity::new(schema, table);
    let (reserved, filters) = partition_params(params);

    let builder = QueryBuilder::new(&state.allow_list, state.catalog.as_ref());
    let query = builder
        .build(
            &identity,
            &filters,
            reserved.date_range().as_ref(),
            reserved.sort().as_ref(),
        )
        .await?;

    let rows = state.executor.fetch(&query).await?;
    Ok(Json(rows))
}

/// The query parameters with dedicated meaning; everything else is a
/// filter.
const RESERVED_PARAMS: [&str; 5] = ["dateColumn", "fromDate", "toDate", "sortBy", "sortOrder"];

#[derive(Debug, Default)]
struct ReservedParams {
    date_column: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl ReservedParams {
    /// Date bounds apply only when a date column was named; stray
    /// `fromDate`/`toDate` without one are ignored.
    fn date_range(&self) -> Option<DateRangeClause> {
        self.date_column.as_ref().map(|column| DateRangeClause {
            column: column.clone(),
            from: self.from_date.clone(),
            to: self.to_date.clone(),
        })
    }

    fn sort(&self) -> Option<SortSpec> {
        self.sort_by.as_ref().map(|column| SortSpec {
            column: column.clone(),
            direction: SortDirection::parse(self.sort_order.as_deref()),
        })
    }
}

fn partition_params(params: HashMap<String, String>) -> (ReservedParams, Vec<FilterClause>) {
    let mut reserved = ReservedParams::default();
    let mut filters = Vec::new();

    for (key, value) in params {
        match key.as_str() {
            "dateColumn" => reserved.date_column = Some(value),
            "fromDate" => reserved.from_date = Some(value),
            "toDate" => reserved.to_date = Some(value),
            "sortBy" => reserved.sort_by = Some(value),
            "sortOrder" => reserved.sort_order = Some(value),
            _ => filters.push(FilterClause::new(key, value)),
        }
    }
    // Stable filter order regardless of HashMap iteration.
    filters.sort_by(|a, b| a.column.cmp(&b.column));

    (reserved, filters)
}
