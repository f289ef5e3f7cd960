//! Query execution against the upstream database.

use async_trait::async_trait;
use datagate_query::{ParameterizedQuery, ScalarValue};
use serde_json::{Map, Value};
use sqlx::{PgPool, Row};
use thiserror::Error;

/// Runs a built statement and returns rows as column-name → value maps.
///
/// Connection pooling and statement timeouts live behind this seam; the
/// query builder itself never touches the database.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch(&self, query: &ParameterizedQuery)
    -> Result<Vec<Map<String, Value>>, ExecuteError>;
}

/// Errors from statement execution.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("query execution failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("row was not a JSON object")]
    UnexpectedRow,
}

/// Postgres executor backed by a sqlx pool.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch(
        &self,
        query: &ParameterizedQuery,
    ) -> Result<Vec<Map<String, Value>>, ExecuteError> {
        let (sql, values) = query.to_positional();

        // Postgres cannot bind named placeholders, and rows come back as
        // JSON objects so the handler never needs per-table row types.
        let wrapped = format!("SELECT to_jsonb(t) AS row FROM ({}) AS t", sql);

        let mut stmt = sqlx::query(&wrapped);
        for value in values {
            stmt = match value {
                ScalarValue::Int(v) => stmt.bind(v),
                ScalarValue::Float(v) => stmt.bind(v),
                ScalarValue::Bool(v) => stmt.bind(v),
                ScalarValue::Date(v) => stmt.bind(v),
                ScalarValue::Timestamp(v) => stmt.bind(v),
                ScalarValue::Text(v) => stmt.bind(v),
            };
        }

        let recs = stmt.fetch_all(&self.pool).await?;
        let mut rows = Vec::with_capacity(recs.len());
        for rec in recs {
            let row: Value = rec.try_get("row")?;
            match row {
                Value::Object(map) => rows.push(map),
                _ => return Err(ExecuteError::UnexpectedRow),
            }
        }

        Ok(rows)
    }
}
