//! Results cache port

use std::future::Future;

/// Errors raised by a cache backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The backend is unreachable or refused the operation.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A cached value could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Namespace-qualified key/value store shared by concurrent requests.
///
/// Writes are idempotent: racing requests store the same fetch result.
pub trait CacheStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the backend cannot be reached.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, CacheError>> + Send;

    /// Stores a value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the backend cannot be reached.
    fn set(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Drops every entry in a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] when the backend cannot be reached.
    fn invalidate(&self, namespace: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}
