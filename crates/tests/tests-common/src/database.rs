//! Test databases.
//!
//! Tests that need PostgreSQL read its connection string from
//! `USERAPP_TEST_DATABASE_URL` and skip themselves when it is unset.

use std::sync::OnceLock;

use sqlx::Executor;
use tokio::sync::{Mutex, MutexGuard};

use userapp_configuration::{create_lazy_pool, create_pool, ConnectionUri, PoolSettings};

pub const TEST_DATABASE_URL_VARIABLE: &str = "USERAPP_TEST_DATABASE_URL";

const SCHEMA_FILE: &str = "static/schema.sql";

/// Every test shares one database, so they take turns.
fn database_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// A pool on a freshly reset database, reserved for one test until dropped.
pub struct TestDatabase {
    pub pool: sqlx::PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Reset the test database and connect to it, or return `None` when no test
/// database is configured.
pub async fn test_database() -> Option<TestDatabase> {
    crate::init_tracing();

    let Ok(url) = std::env::var(TEST_DATABASE_URL_VARIABLE) else {
        tracing::warn!(
            "{TEST_DATABASE_URL_VARIABLE} is not set, skipping a test that needs PostgreSQL"
        );
        return None;
    };

    let guard = database_lock().lock().await;

    let settings = PoolSettings {
        max_connections: 5,
        ..PoolSettings::default()
    };
    let pool = create_pool(&ConnectionUri::from(url), &settings)
        .await
        .expect("could not connect to the test database");

    let schema = std::fs::read_to_string(crate::repository_file(SCHEMA_FILE))
        .expect("could not read the schema file");
    pool.execute(schema.as_str())
        .await
        .expect("could not apply the schema");

    Some(TestDatabase {
        pool,
        _guard: guard,
    })
}

/// A pool that never connects unless used. For requests rejected before any query runs.
pub fn unreachable_pool() -> sqlx::PgPool {
    create_lazy_pool(
        &ConnectionUri::from("postgres://userapp@127.0.0.1:1/unreachable"),
        &PoolSettings::default(),
    )
    .expect("could not create a lazy pool")
}
