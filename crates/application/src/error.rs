//! Application error types

use cirrus_domain::DomainError;
use thiserror::Error;

use crate::ports::{CacheError, ProviderError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The cloud provider rejected or failed a call.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The results cache failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Settings could not be loaded or are inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApplicationError {
    /// Returns the provider fault, if this error carries one.
    #[must_use]
    pub const fn as_provider(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
