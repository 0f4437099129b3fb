//! State shared by every request handler.

use std::sync::Arc;

use query_engine_execution::metrics;
use query_engine_metadata::metadata;

use crate::resources;

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
    pub tables_info: Arc<metadata::TablesInfo>,
}

impl AppState {
    /// Build the state around a connection pool, registering the service's metrics
    /// in a fresh registry.
    pub fn new(pool: sqlx::PgPool) -> Result<AppState, metrics::Error> {
        let mut metrics_registry = prometheus::Registry::new();
        let metrics = metrics::Metrics::initialize(&mut metrics_registry)?;
        Ok(AppState {
            pool,
            metrics,
            metrics_registry,
            tables_info: Arc::new(resources::tables_info()),
        })
    }
}
