//! In-memory catalog for tests and fixtures.

use crate::{CatalogError, ColumnType, SchemaCatalog};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Schema catalog backed by a fixed in-memory table map.
///
/// Counts lookups so tests can assert that certain request paths never
/// reach the metadata layer at all.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    tables: HashMap<(String, String), Vec<(String, ColumnType)>>,
    lookups: AtomicUsize,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its columns.
    pub fn with_table(
        mut self,
        schema: &str,
        table: &str,
        columns: &[(&str, ColumnType)],
    ) -> Self {
        self.tables.insert(
            (schema.to_string(), table.to_string()),
            columns
                .iter()
                .map(|(name, ty)| (name.to_string(), *ty))
                .collect(),
        );
        self
    }

    /// Number of metadata lookups performed so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn columns(&self, schema: &str, table: &str) -> Option<&Vec<(String, ColumnType)>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.tables.get(&(schema.to_string(), table.to_string()))
    }
}

#[async_trait]
impl SchemaCatalog for StaticCatalog {
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, CatalogError> {
        Ok(self.columns(schema, table).is_some())
    }

    async fn column_exists(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<bool, CatalogError> {
        Ok(self
            .columns(schema, table)
            .is_some_and(|cols| cols.iter().any(|(name, _)| name == column)))
    }

    async fn column_type(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<ColumnType, CatalogError> {
        self.columns(schema, table)
            .and_then(|cols| {
                cols.iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, ty)| *ty)
            })
            .ok_or_else(|| CatalogError::ColumnNotFound {
                schema: schema.to_string(),
                table: table.to_string(),
                column: column.to_string(),
            })
    }
}
