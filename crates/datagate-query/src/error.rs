//! Error types for query building.

use datagate_catalog::{CatalogError, ColumnType};
use thiserror::Error;

/// Errors that can occur while building a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The (schema, table) pair is unknown or not allow-listed.
    #[error("Invalid schema or table name: {schema}.{table}")]
    InvalidTarget { schema: String, table: String },

    /// A column used in a fatal position (date range) does not exist.
    #[error("Invalid filter column: {column} in {schema}.{table}")]
    InvalidColumn {
        schema: String,
        table: String,
        column: String,
    },

    /// A value failed coercion to the column's declared type.
    #[error("Invalid format for value: {value} expected type: {expected}")]
    InvalidValue { value: String, expected: ColumnType },

    /// A metadata lookup failed for reasons unrelated to caller input.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl QueryError {
    /// Whether this error was caused by the caller's input (as opposed to
    /// an infrastructure failure).
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidTarget { .. } | Self::InvalidColumn { .. } | Self::InvalidValue { .. } => {
                true
            }
            Self::Catalog(CatalogError::ColumnNotFound { .. }) => true,
            Self::Catalog(CatalogError::Infrastructure(_)) => false,
        }
    }
}
