use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use player_api::db::{MemoryPlayerStore, PlayerStore, SqlitePlayerStore};
use player_api::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so RUST_LOG from it reaches the filter
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting player api server...");

    let config = Config::from_env()?;

    let store: Arc<dyn PlayerStore> = if config.uses_memory_store() {
        Arc::new(MemoryPlayerStore::new())
    } else {
        Arc::new(SqlitePlayerStore::connect(&config.database_url, config.max_connections).await?)
    };

    tracing::info!(
        store = %store.describe(),
        shape = %config.response_shape,
        timeout = ?config.request_timeout,
        "Player store ready."
    );

    let app = routes::router(AppState::from_config(store, &config));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
