use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use query_engine_execution::error::{Error, ErrorKind};

/// The ways a request can fail, as reported to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Execution(#[from] Error),
    /// The request body was not valid JSON for the payload.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    /// A path segment, such as a record id, did not parse.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Could not encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Serialize)]
struct JsonErrorResponse {
    message: String,
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Execution(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Execution(err) => match err.kind() {
                ErrorKind::ParseFailure
                | ErrorKind::InvalidPagination
                | ErrorKind::ConstraintViolation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::ValidationFailure => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // the details stay in the logs.
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
            self.to_string()
        };

        (status, Json(JsonErrorResponse { message })).into_response()
    }
}
