//! Handlers shared by every resource: list, get, create, update and delete.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use query_engine_execution::{
    error::Error,
    mutation::{self, Payload},
    query,
};
use query_engine_translation::translation;
use translation::query::root::Restriction;

use crate::error::ApiError;
use crate::resources::{Collection, Resource};
use crate::state::AppState;

/// Carries the number of rows matching a listing's filters.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

pub async fn list<C: Collection>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    list_rows(&state, C::COLLECTION, None, &params).await
}

/// Run a listing and answer with the page as a JSON array, the total in a header.
pub(super) async fn list_rows(
    state: &AppState,
    collection: &str,
    restriction: Option<&Restriction>,
    params: &[(String, String)],
) -> Result<Response, ApiError> {
    let plan = translation::query::translate(&state.tables_info, collection, restriction, params)
        .map_err(Error::from)?;

    let mut transaction = state.pool.begin().await?;
    let result = query::execute(&mut *transaction, &state.metrics, plan).await?;
    transaction.commit().await?;

    Ok((
        [(TOTAL_COUNT_HEADER, result.total_count.to_string())],
        Json(result.rows),
    )
        .into_response())
}

pub async fn get_one<C: Collection>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(id) = id?;

    let mut transaction = state.pool.begin().await?;
    let record = mutation::get_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        C::COLLECTION,
        id,
    )
    .await?;
    transaction.commit().await?;
    Ok(Json(record))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Create>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(payload) = payload?;
    payload.validate().map_err(Error::ValidationFailure)?;

    let mut transaction = state.pool.begin().await?;
    let record = mutation::create_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        R::COLLECTION,
        &payload,
    )
    .await?;
    transaction.commit().await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Serves both PUT and PATCH: only the fields present in the body change.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<R::Update>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate().map_err(Error::ValidationFailure)?;

    let mut transaction = state.pool.begin().await?;
    let record = mutation::update_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        R::COLLECTION,
        id,
        &payload,
    )
    .await?;
    transaction.commit().await?;
    Ok(Json(record))
}

pub async fn delete<C: Collection>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    let mut transaction = state.pool.begin().await?;
    mutation::delete_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        C::COLLECTION,
        id,
    )
    .await?;
    transaction.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
