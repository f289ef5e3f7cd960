//! # datagate-query
//!
//! Dynamic query building and validation for Datagate.
//!
//! This crate turns untrusted request parameters (schema, table, column
//! filters, date bounds, sort) into a safe, parameterized SQL statement:
//!
//! - Every identifier (schema, table, column) is validated against the
//!   configured allow-list and the schema catalog before it appears in
//!   SQL text.
//! - Every value is coerced to the column's declared type and bound as a
//!   named parameter. Caller-supplied strings are never interpolated into
//!   the WHERE clause.
//!
//! **Before (request):**
//! ```text
//! GET /api/data/mdm_internal/location_master_raw_tb?is_active=true&sortBy=location_code&sortOrder=desc
//! ```
//!
//! **After (statement):**
//! ```sql
//! SELECT * FROM "mdm_internal"."location_master_raw_tb" WHERE 1=1
//!   AND "is_active" = :is_active ORDER BY "location_code" DESC
//! ```
//!
//! The builder performs no I/O of its own beyond catalog lookups and holds
//! no mutable state; concurrent requests need no coordination.

pub mod builder;
pub mod error;
pub mod request;
pub mod statement;
pub mod value;

pub use builder::QueryBuilder;
pub use error::QueryError;
pub use request::{DateRangeClause, FilterClause, SortDirection, SortSpec, TableIdentity};
pub use statement::ParameterizedQuery;
pub use value::{ScalarValue, coerce_value};
