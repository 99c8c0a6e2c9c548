//! Store error types.

use tgadmin_client::{ApiError, SessionError};
use tgadmin_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid list query or data.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session token storage failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns the backend error, if this wraps one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            StoreError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_unauthorized)
    }
}
