//! Store-layer error model.

use thiserror::Error;

use larder_core::DomainError;

/// Error returned by store operations.
///
/// Deterministic business failures pass through as [`DomainError`]; everything
/// else (connection loss, malformed rows, poisoned locks) is a backend
/// failure, which the HTTP layer maps to a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Backend(value.to_string())
    }
}
