use clap::Parser;
use datagate_catalog::PgCatalog;
use datagate_core::DatagateConfig;
use datagate_server::{AppState, PgExecutor, create_router};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Generic allow-listed table query API.
#[derive(Debug, Parser)]
#[command(name = "datagate-server")]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "datagate.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        )
        .init();

    let args = Args::parse();
    let config = DatagateConfig::from_file(&args.config)?;
    if config.allowed_tables.is_empty() {
        tracing::warn!("allow-list is empty; every request will be rejected");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.upstream.max_connections)
        .connect(&config.upstream.connection_string())
        .await?;

    let state = Arc::new(AppState {
        allow_list: config.allow_list(),
        catalog: Arc::new(PgCatalog::new(pool.clone())),
        executor: Arc::new(PgExecutor::new(pool)),
    });

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.bind_addr();
    tracing::info!("datagate-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
