//! Metrics setup and update for the service.

use prometheus::core::{AtomicI64, AtomicU64, GenericCounter, GenericGauge};

/// The collection of all metrics exposed through the `/metrics` endpoint.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub list_queries_total: GenericCounter<AtomicU64>,
    pub record_operations_total: GenericCounter<AtomicU64>,
    pub client_errors_total: GenericCounter<AtomicU64>,
    pub server_errors_total: GenericCounter<AtomicU64>,
    pub pool_size: GenericGauge<AtomicI64>,
    pub pool_idle_count: GenericGauge<AtomicI64>,
    pub pool_max_connections: GenericGauge<AtomicI64>,
}

impl Metrics {
    /// Set up counters and gauges used to produce Prometheus metrics
    pub fn initialize(metrics_registry: &mut prometheus::Registry) -> Result<Self, Error> {
        let list_queries_total = add_int_counter_metric(
            metrics_registry,
            "userapp_list_queries_total",
            "Total successful listings.",
        )?;

        let record_operations_total = add_int_counter_metric(
            metrics_registry,
            "userapp_record_operations_total",
            "Total successful single-record operations.",
        )?;

        let client_errors_total = add_int_counter_metric(
            metrics_registry,
            "userapp_client_errors_total",
            "Total requests rejected as the client's fault.",
        )?;

        let server_errors_total = add_int_counter_metric(
            metrics_registry,
            "userapp_server_errors_total",
            "Total requests that failed on the server side.",
        )?;

        let pool_size = add_int_gauge_metric(
            metrics_registry,
            "userapp_pool_size",
            "The number of connections currently active. This includes idle connections.",
        )?;

        let pool_idle_count = add_int_gauge_metric(
            metrics_registry,
            "userapp_pool_idle_count",
            "The number of connections active and idle (not in use).",
        )?;

        let pool_max_connections = add_int_gauge_metric(
            metrics_registry,
            "userapp_pool_max_connections",
            "The maximum number of connections that this pool should maintain.",
        )?;

        Ok(Self {
            list_queries_total,
            record_operations_total,
            client_errors_total,
            server_errors_total,
            pool_size,
            pool_idle_count,
            pool_max_connections,
        })
    }

    /// Refresh the pool gauges from the pool's current state.
    pub fn update_pool_metrics(&self, pool: &sqlx::PgPool) {
        let pool_size: i64 = pool.size().into();
        self.pool_size.set(pool_size);

        let pool_idle: i64 = pool.num_idle().try_into().unwrap_or(i64::MAX);
        self.pool_idle_count.set(pool_idle);

        let max_connections: i64 = pool.options().get_max_connections().into();
        self.pool_max_connections.set(max_connections);
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, int_counter)
}

/// Create a new int gauge metric and register it with the provided Prometheus Registry
fn add_int_gauge_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicI64>, Error> {
    let int_gauge =
        prometheus::IntGauge::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, int_gauge)
}

/// Register a [prometheus::core::Collector] with a [prometheus::Registry].
fn register_collector<Collector: prometheus::core::Collector + std::clone::Clone + 'static>(
    metrics_registry: &mut prometheus::Registry,
    collector: Collector,
) -> Result<Collector, Error> {
    metrics_registry.register(Box::new(collector.clone()))?;
    Ok(collector)
}

/// A wrapper around the Prometheus error type.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Error(#[from] prometheus::Error);
