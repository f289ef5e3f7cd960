//! Postgres-backed catalog using `information_schema` introspection.

use crate::{CatalogError, ColumnType, SchemaCatalog};
use async_trait::async_trait;
use sqlx::PgPool;

/// Schema catalog backed by live Postgres metadata.
///
/// Every lookup is a fresh, parameterized query against
/// `information_schema`; nothing is cached, so a schema change is visible
/// on the next request.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaCatalog for PgCatalog {
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, CatalogError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            select exists (
                select 1 from information_schema.tables
                where table_schema = $1 and table_name = $2
            )
            "#,
        )
        .bind(schema)
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn column_exists(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<bool, CatalogError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            select exists (
                select 1 from information_schema.columns
                where table_schema = $1 and table_name = $2 and column_name = $3
            )
            "#,
        )
        .bind(schema)
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn column_type(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<ColumnType, CatalogError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            select data_type from information_schema.columns
            where table_schema = $1 and table_name = $2 and column_name = $3
            "#,
        )
        .bind(schema)
        .bind(table)
        .bind(column)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((data_type,)) => Ok(ColumnType::from_pg_data_type(&data_type)),
            None => Err(CatalogError::ColumnNotFound {
                schema: schema.to_string(),
                table: table.to_string(),
                column: column.to_string(),
            }),
        }
    }
}
