//! Connection pool construction.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::values::{ConnectionUri, PoolSettings};

fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.pool_timeout))
        .idle_timeout(Duration::from_secs(settings.idle_timeout))
        .max_lifetime(Duration::from_secs(settings.connection_lifetime))
}

/// Create a connection pool and wait for its first connection.
pub async fn create_pool(
    connection_uri: &ConnectionUri,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    pool_options(settings)
        .connect(connection_uri.expose())
        .await
}

/// Create a connection pool that only connects once a connection is first needed.
pub fn create_lazy_pool(
    connection_uri: &ConnectionUri,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    pool_options(settings).connect_lazy(connection_uri.expose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lazy_pools_honour_the_settings() {
        let settings = PoolSettings {
            max_connections: 3,
            ..PoolSettings::default()
        };
        let pool = create_lazy_pool(
            &ConnectionUri::from("postgres://localhost/userapp"),
            &settings,
        )
        .unwrap();

        assert_eq!(pool.options().get_max_connections(), 3);
        assert_eq!(
            pool.options().get_acquire_timeout(),
            Duration::from_secs(600)
        );
        assert_eq!(pool.size(), 0);
    }
}
