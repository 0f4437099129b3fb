//! Errors for execution.

use thiserror::Error;

use query_engine_translation::translation;

/// The errors a listing or a single-record operation may end in.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be translated: a malformed filter, invalid paging,
    /// or an unknown collection.
    #[error("{0}")]
    Translation(#[from] translation::error::Error),
    /// The record does not exist.
    #[error("{0} not found.")]
    NotFound(String),
    /// The database rejected a statement, for example a violated uniqueness,
    /// foreign key or check constraint.
    #[error("Database error occurred, likely due to violation of constraints: {0}")]
    ConstraintViolation(String),
    /// The payload was rejected before reaching the database.
    #[error("Data validation error: {0}")]
    ValidationFailure(String),
    /// The database could not be reached or answered unexpectedly.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    /// A result could not be read back.
    #[error("Could not decode result: {0}")]
    Decode(String),
}

/// Errors reported by the server itself are the client's doing, anything else
/// (connection, pool, protocol) is ours.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Error {
        match err {
            sqlx::Error::Database(database_error) => {
                Error::ConstraintViolation(database_error.message().to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Error::Decode(err.to_string())
            }
            err => Error::Database(err),
        }
    }
}

/// How an error should be reported to whoever made the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseFailure,
    InvalidPagination,
    NotFound,
    ConstraintViolation,
    ValidationFailure,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Translation(err) if err.is_parse_failure() => ErrorKind::ParseFailure,
            Error::Translation(translation::error::Error::InvalidPagination(_)) => {
                ErrorKind::InvalidPagination
            }
            Error::Translation(_) | Error::Database(_) | Error::Decode(_) => ErrorKind::Internal,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Error::ValidationFailure(_) => ErrorKind::ValidationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_filters_are_parse_failures() {
        let err = Error::from(translation::error::Error::MalformedOrClause("a".to_string()));
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn bad_paging_is_invalid_pagination() {
        let err = Error::from(translation::error::Error::InvalidPagination(
            "page must be >= 0, got -1".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidPagination);
    }

    #[test]
    fn unknown_collections_are_internal() {
        let err = Error::from(translation::error::Error::CollectionNotFound(
            "widgets".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn pool_faults_are_internal() {
        let err = Error::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn missing_rows_are_internal() {
        assert_eq!(
            Error::from(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Internal
        );
    }
}
