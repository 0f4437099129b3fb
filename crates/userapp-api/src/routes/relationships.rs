//! Listings of the records linked to another one, and the membership and note writes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};

use query_engine_execution::{
    error::Error,
    mutation::{self, Payload},
};
use query_engine_translation::translation::query::root::{JoinRestriction, Restriction};

use super::records::list_rows;
use crate::error::ApiError;
use crate::payloads::{
    ProjectMember, ProjectNote, Relationship, UserGroupLink, UserNoteLink, UserProjectLink,
};
use crate::resources::{
    GROUPS, JOINED_PROJECTS, NOTES, USERS, USER_GROUPS, USER_NOTES, USER_PROJECTS,
    USER_SUBMIT_NODES,
};
use crate::state::AppState;

fn joined(join_collection: &str, source_column: &str, target_column: &str, id: i64) -> Restriction {
    Restriction::Joined(JoinRestriction {
        join_collection: join_collection.to_string(),
        source_column: source_column.to_string(),
        target_column: target_column.to_string(),
        target_id: id,
    })
}

fn column_equals(column: &str, id: i64) -> Restriction {
    Restriction::ColumnEquals {
        column: column.to_string(),
        id,
    }
}

/// `GET /groups/:id/users`
pub async fn list_group_users(
    State(state): State<AppState>,
    group_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(group_id) = group_id?;
    let members = joined(USER_GROUPS, "user_id", "group_id", group_id);
    list_rows(&state, USERS, Some(&members), &params).await
}

/// `GET /users/:id/groups`
pub async fn list_user_groups(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(user_id) = user_id?;
    let memberships = joined(USER_GROUPS, "group_id", "user_id", user_id);
    list_rows(&state, GROUPS, Some(&memberships), &params).await
}

/// `GET /projects/:id/users`, one `joined_projects` row per member.
pub async fn list_project_users(
    State(state): State<AppState>,
    project_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(project_id) = project_id?;
    let members = column_equals("project_id", project_id);
    list_rows(&state, JOINED_PROJECTS, Some(&members), &params).await
}

/// `GET /users/:id/projects`
pub async fn list_user_projects(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(user_id) = user_id?;
    let memberships = column_equals("user_id", user_id);
    list_rows(&state, JOINED_PROJECTS, Some(&memberships), &params).await
}

/// `GET /users/:id/submit_nodes`
pub async fn list_user_submit_nodes(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(user_id) = user_id?;
    let submits = column_equals("user_id", user_id);
    list_rows(&state, USER_SUBMIT_NODES, Some(&submits), &params).await
}

/// `GET /projects/:id/notes`
pub async fn list_project_notes(
    State(state): State<AppState>,
    project_id: Result<Path<i64>, PathRejection>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let Path(project_id) = project_id?;
    let notes = joined(USER_NOTES, "note_id", "project_id", project_id);
    list_rows(&state, NOTES, Some(&notes), &params).await
}

/// `POST /groups/:id/users` with `{"id": <user id>}`
pub async fn add_group_user(
    State(state): State<AppState>,
    group_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Relationship>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Path(group_id) = group_id?;
    let Json(Relationship { id: user_id }) = payload?;

    let mut transaction = state.pool.begin().await?;
    mutation::create_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USER_GROUPS,
        &UserGroupLink { group_id, user_id },
    )
    .await?;
    transaction.commit().await?;

    tracing::info!(group_id, user_id, "user added to group");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"message": "User added to group successfully"})),
    ))
}

/// `DELETE /groups/:id/users/:user_id`
pub async fn remove_group_user(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((group_id, user_id)) = ids?;

    let mut transaction = state.pool.begin().await?;
    mutation::delete_matching(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USER_GROUPS,
        &[("group_id", group_id), ("user_id", user_id)],
    )
    .await?;
    transaction.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /projects/:id/users` with `{"user_id": .., "role": .., "is_primary": ..}`
pub async fn add_project_user(
    State(state): State<AppState>,
    project_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProjectMember>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Path(project_id) = project_id?;
    let Json(member) = payload?;
    let link = UserProjectLink {
        project_id,
        user_id: member.user_id,
        role: member.role,
        is_primary: member.is_primary,
    };
    link.validate().map_err(Error::ValidationFailure)?;

    let mut transaction = state.pool.begin().await?;
    // an unknown user is a 404, not a foreign key violation.
    mutation::get_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USERS,
        link.user_id,
    )
    .await?;
    mutation::create_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USER_PROJECTS,
        &link,
    )
    .await?;
    transaction.commit().await?;

    tracing::info!(project_id, user_id = link.user_id, "user added to project");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("User {} added to project {project_id}", link.user_id)
        })),
    ))
}

/// `DELETE /projects/:id/users/:user_id`
pub async fn remove_project_user(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((project_id, user_id)) = ids?;

    let mut transaction = state.pool.begin().await?;
    mutation::delete_matching(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USER_PROJECTS,
        &[("project_id", project_id), ("user_id", user_id)],
    )
    .await?;
    transaction.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /projects/:id/notes`
///
/// Creates the note, ties it to the project, then to each listed user on that
/// project. Answers with the note.
pub async fn add_project_note(
    State(state): State<AppState>,
    project_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProjectNote>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Path(project_id) = project_id?;
    let Json(ProjectNote { note, users }) = payload?;
    note.validate().map_err(Error::ValidationFailure)?;

    let mut transaction = state.pool.begin().await?;
    let created = mutation::create_one(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        NOTES,
        &note,
    )
    .await?;
    let note_id = created
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| Error::Decode("created note has no id".to_string()))?;

    let links = std::iter::once(None).chain(users.iter().copied().map(Some));
    for user_id in links {
        mutation::create_one(
            &mut *transaction,
            &state.metrics,
            &state.tables_info,
            USER_NOTES,
            &UserNoteLink {
                project_id,
                note_id,
                user_id,
            },
        )
        .await?;
    }
    transaction.commit().await?;

    tracing::info!(project_id, note_id, users = users.len(), "note added to project");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /projects/:id/notes/:note_id` unlinks the note from the project.
pub async fn remove_project_note(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((project_id, note_id)) = ids?;

    let mut transaction = state.pool.begin().await?;
    mutation::delete_matching(
        &mut *transaction,
        &state.metrics,
        &state.tables_info,
        USER_NOTES,
        &[("project_id", project_id), ("note_id", note_id)],
    )
    .await?;
    transaction.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
