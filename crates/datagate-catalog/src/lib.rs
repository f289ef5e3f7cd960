//! # datagate-catalog
//!
//! Schema catalog: an authoritative, queryable view of which schemas,
//! tables, and columns exist in the upstream database, and what type each
//! column is declared as.
//!
//! The catalog is consulted by the query builder before any identifier is
//! placed into SQL text. It is read-only: lookups never mutate database
//! state, and metadata failures are surfaced as
//! [`CatalogError::Infrastructure`] rather than swallowed.

pub mod error;
pub mod pg;
pub mod static_catalog;
pub mod types;

pub use error::CatalogError;
pub use pg::PgCatalog;
pub use static_catalog::StaticCatalog;
pub use types::ColumnType;

use async_trait::async_trait;

/// Read-only view of database metadata.
///
/// Implementations must be safe for concurrent use: each lookup is an
/// independent read with no session-affine state.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// True iff the database metadata lists this schema + table.
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, CatalogError>;

    /// True iff the metadata lists this column for the table.
    async fn column_exists(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<bool, CatalogError>;

    /// The declared type of the column.
    ///
    /// Fails with [`CatalogError::ColumnNotFound`] if the column does not
    /// exist; callers should check [`Self::column_exists`] first.
    async fn column_type(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<ColumnType, CatalogError>;
}
