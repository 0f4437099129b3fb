use axum_test_helper::TestClient;

use tests_common::database::{self, TestDatabase};
use userapp_api::{create_router, AppState};

/// A client for requests that are rejected before any query runs.
pub fn client_without_database() -> TestClient {
    tests_common::init_tracing();
    let state = AppState::new(database::unreachable_pool()).unwrap();
    tests_common::client::client(create_router(state))
}

/// A client backed by a freshly reset test database, or `None` when none is configured.
/// Keep the database alive for as long as the client is used.
pub async fn client_with_database() -> Option<(TestDatabase, TestClient)> {
    let database = database::test_database().await?;
    let state = AppState::new(database.pool.clone()).unwrap();
    let client = tests_common::client::client(create_router(state));
    Some((database, client))
}
