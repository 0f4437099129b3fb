use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Check that the database answers.
pub async fn get_health(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Prometheus text exposition of the service's metrics.
pub async fn get_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.metrics.update_pool_metrics(&state.pool);
    let body = prometheus::TextEncoder::new().encode_to_string(&state.metrics_registry.gather())?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
