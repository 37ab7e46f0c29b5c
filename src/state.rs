use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use fts_backend::config::AppConfig;
use fts_backend::metrics::Metrics;
use fts_backend::search::{SearchEngine, SearchOptions};
use fts_backend::storage::DocumentStore;

/// Service context shared by every handler; created at startup, dropped at shutdown
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
    pub engine: SearchEngine,
    pub metrics: Metrics,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, shutdown: CancellationToken) -> Self {
        let options = SearchOptions::from(&config.search);
        let engine = SearchEngine::with_options(store.clone(), options, shutdown);
        let metrics = Metrics::new(config.metrics.project_name.clone());

        Self {
            config,
            store,
            engine,
            metrics,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}
