//! Error types for catalog lookups.

use thiserror::Error;

/// Errors that can occur while querying database metadata.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The column is not listed in the metadata for the table.
    #[error("column not found: {column} in {schema}.{table}")]
    ColumnNotFound {
        schema: String,
        table: String,
        column: String,
    },

    /// The metadata query itself failed (connectivity, permissions).
    #[error("metadata query failed: {0}")]
    Infrastructure(#[from] sqlx::Error),
}
