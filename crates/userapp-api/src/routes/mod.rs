mod records;
mod relationships;
mod service;

use axum::{
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tracing::{info_span, Instrument};

use crate::resources::{
    Groups, Notes, PiProjects, Projects, Resource, SubmitNodes, Tokens, Users,
};
use crate::state::AppState;

pub use records::TOTAL_COUNT_HEADER;

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(service::get_health))
        .route("/metrics", get(service::get_metrics));

    let router = resource_routes::<Groups>(router, "/groups");
    let router = resource_routes::<Users>(router, "/users");
    let router = resource_routes::<Projects>(router, "/projects");
    let router = resource_routes::<Notes>(router, "/notes");
    let router = resource_routes::<SubmitNodes>(router, "/submit_nodes");

    router
        .route("/tokens", get(records::list::<Tokens>))
        .route(
            "/tokens/:id",
            get(records::get_one::<Tokens>).delete(records::delete::<Tokens>),
        )
        .route(
            "/groups/:id/users",
            get(relationships::list_group_users).post(relationships::add_group_user),
        )
        .route(
            "/groups/:id/users/:user_id",
            axum::routing::delete(relationships::remove_group_user),
        )
        .route("/users/:id/groups", get(relationships::list_user_groups))
        .route("/users/:id/projects", get(relationships::list_user_projects))
        .route(
            "/users/:id/submit_nodes",
            get(relationships::list_user_submit_nodes),
        )
        .route(
            "/projects/:id/users",
            get(relationships::list_project_users).post(relationships::add_project_user),
        )
        .route(
            "/projects/:id/users/:user_id",
            axum::routing::delete(relationships::remove_project_user),
        )
        .route(
            "/projects/:id/notes",
            get(relationships::list_project_notes).post(relationships::add_project_note),
        )
        .route(
            "/projects/:id/notes/:note_id",
            axum::routing::delete(relationships::remove_project_note),
        )
        .route("/pi-projects", get(records::list::<PiProjects>))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

fn resource_routes<R: Resource>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(
            path,
            get(records::list::<R>).post(records::create::<R>),
        )
        .route(
            &format!("{path}/:id"),
            get(records::get_one::<R>)
                .put(records::update::<R>)
                .patch(records::update::<R>)
                .delete(records::delete::<R>),
        )
}

/// Run each request in its own span and count the failed ones.
async fn track_requests<B>(
    State(state): State<AppState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let span = info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    );
    let response = next.run(request).instrument(span).await;

    let status = response.status();
    if status.is_client_error() {
        state.metrics.client_errors_total.inc();
    } else if status.is_server_error() {
        state.metrics.server_errors_total.inc();
    }
    response
}
