//! Shared application state.

use crate::executor::QueryExecutor;
use datagate_catalog::SchemaCatalog;
use datagate_core::TableAllowList;
use std::sync::Arc;

/// State shared by all request handlers.
///
/// Everything here is read-only per request; the only shared resource is
/// the connection pool owned by the catalog/executor implementations.
pub struct AppState {
    pub allow_list: TableAllowList,
    pub catalog: Arc<dyn SchemaCatalog>,
    pub executor: Arc<dyn QueryExecutor>,
}
