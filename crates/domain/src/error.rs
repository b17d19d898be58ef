//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The cloud flavor tag is not one of the two supported backends.
    #[error("invalid cloud flavor: {0}")]
    InvalidCloudFlavor(String),

    /// The region identifier is empty or not recognized.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// The session carries no usable credentials.
    #[error("session is not authenticated: {0}")]
    NotAuthenticated(String),

    /// A sort key is empty or malformed.
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    /// A query string could not be interpreted.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
