//! # datagate-server
//!
//! HTTP surface for Datagate: a single generic endpoint,
//! `GET /api/data/{schema}/{table}`, that runs dynamically built,
//! validated queries against allow-listed tables.
//!
//! The server wires the query builder to a [`SchemaCatalog`] and a
//! [`QueryExecutor`]; both are trait seams so the router can be exercised
//! in tests without a database.
//!
//! [`SchemaCatalog`]: datagate_catalog::SchemaCatalog
//! [`QueryExecutor`]: executor::QueryExecutor

pub mod error;
pub mod executor;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use executor::{ExecuteError, PgExecutor, QueryExecutor};
pub use routes::create_router;
pub use state::AppState;
