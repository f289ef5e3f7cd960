//! # datagate-core
//!
//! Configuration types shared across the Datagate crates.
//!
//! Configuration is loaded from a YAML file (datagate.yaml) and combined
//! into a single [`DatagateConfig`] structure: server settings, the
//! upstream Postgres connection, and the allow-list of tables the API is
//! permitted to expose.

pub mod config;

pub use config::{
    AllowedTable, ConfigError, DatagateConfig, ServerConfig, TableAllowList, UpstreamConfig,
};
