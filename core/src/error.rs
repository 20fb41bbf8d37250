//! Error types raised across crate boundaries.

use thiserror::Error;

/// Error raised by a user-supplied callback (access predicate or hook).
///
/// The pipeline never inspects the message; it wraps the error into its own
/// taxonomy depending on which callback raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Result type for user callbacks.
pub type CallbackResult<T> = Result<T, CallbackError>;

/// Opaque failure reported by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the request.
    #[error("store backend error: {message}")]
    Backend { message: String },

    /// The backend reported a conflicting concurrent write.
    #[error("store conflict: {message}")]
    Conflict { message: String },

    /// Any other error the adapter wants to surface as-is.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
