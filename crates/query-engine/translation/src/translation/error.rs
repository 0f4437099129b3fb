//! Errors for translation.

use thiserror::Error;

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Collection '{0}' not found.")]
    CollectionNotFound(String),
    #[error("Column '{0}' not found in collection '{1}'.")]
    ColumnNotFoundInCollection(String, String),
    #[error("The 'or' value '{0}' must be wrapped in a single pair of parentheses.")]
    OrGroupNotParenthesised(String),
    #[error("Malformed clause '{0}' in 'or' group, expected '<column>.<operator>'.")]
    MalformedOrClause(String),
    #[error("Unsupported operator '{value}' for column '{column}'.")]
    UnsupportedOperator { column: String, value: String },
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

impl Error {
    /// Whether the error comes from a malformed filter, as opposed to bad paging
    /// or an unknown collection.
    pub fn is_parse_failure(&self) -> bool {
        match self {
            Error::ColumnNotFoundInCollection(_, _)
            | Error::OrGroupNotParenthesised(_)
            | Error::MalformedOrClause(_)
            | Error::UnsupportedOperator { .. } => true,
            Error::CollectionNotFound(_) | Error::InvalidPagination(_) => false,
        }
    }
}
