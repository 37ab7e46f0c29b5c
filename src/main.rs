use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use fts_backend::config::{self, AppConfig, LoggingConfig, StorageBackend};
use fts_backend::storage::{DocumentStore, MemoryStore, SqliteStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load_config()?;
    init_tracing(&app_config.logging)?;
    tracing::info!("Loaded configuration from {:?}", config::get_config_path());

    let (store, sqlite) = open_store(&app_config).await?;

    let shutdown = CancellationToken::new();
    let bind_addr = app_config.get_bind_address();
    let state = Arc::new(AppState::new(app_config, store, shutdown.clone()));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    if let Some(sqlite) = sqlite {
        sqlite.close().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let file_layer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

/// The sqlite handle is returned separately so its pool can be closed on shutdown
async fn open_store(
    app_config: &AppConfig,
) -> anyhow::Result<(Arc<dyn DocumentStore>, Option<Arc<SqliteStore>>)> {
    match app_config.database.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory document store, documents are lost on restart");
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
            Ok((store, None))
        }
        StorageBackend::Sqlite => {
            let data_dir = app_config.get_data_dir();
            if !data_dir.exists() {
                std::fs::create_dir_all(&data_dir)?;
                tracing::info!("Created data directory: {:?}", data_dir);
            }

            let database_url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| app_config.get_database_url());
            let sqlite = SqliteStore::connect(&database_url, app_config.database.max_connections)
                .await
                .with_context(|| format!("Failed to open database {}", database_url))?;
            sqlite.init().await?;
            tracing::info!("Database ready: {}", database_url);

            let sqlite = Arc::new(sqlite);
            let store: Arc<dyn DocumentStore> = sqlite.clone();
            Ok((store, Some(sqlite)))
        }
    }
}

/// Resolves on Ctrl-C and cancels in-flight searches
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, cancelling running searches");
    shutdown.cancel();
}
