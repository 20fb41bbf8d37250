//! Mutation error types.

use bastion_access::AccessError;
use bastion_core::{FieldErrors, Key, Operation, StoreError};
use bastion_hooks::HookError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while resolving or committing a mutation.
///
/// A denial on the root operation is not an error: `mutate` returns
/// `Ok(None)` for it. Every variant here aborts the whole mutation before
/// anything is persisted, except `Store` raised by the persist call itself
/// and `Hook` raised by an `after_operation` hook.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("Access denied: {operation} on {entity} at {path}")]
    AccessDenied {
        entity: String,
        operation: Operation,
        path: String,
    },

    #[error("Access rule on {entity} failed: {message}")]
    AccessRule { entity: String, message: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),

    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: Key },

    #[error("Invalid nested input at {path}: {message}")]
    InvalidNestedInput { path: String, message: String },

    #[error("{hook} hook on {entity}{} failed: {message}", path_suffix(.path))]
    Hook {
        entity: String,
        hook: String,
        /// Node path within the payload tree; empty for the root.
        path: String,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Mutation cancelled")]
    Cancelled,
}

impl MutationError {
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    pub fn access_denied(
        entity: impl Into<String>,
        operation: Operation,
        path: impl Into<String>,
    ) -> Self {
        Self::AccessDenied {
            entity: entity.into(),
            operation,
            path: path.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, key: Key) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key,
        }
    }

    pub fn invalid_nested_input(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNestedInput {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error carries field-scoped validation messages.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<AccessError> for MutationError {
    fn from(e: AccessError) -> Self {
        let entity = match &e {
            AccessError::Predicate { entity, .. } | AccessError::FieldPredicate { entity, .. } => {
                entity.clone()
            }
        };
        Self::AccessRule {
            entity,
            message: e.to_string(),
        }
    }
}

impl MutationError {
    /// Wrap a hook failure raised at the node `path`.
    pub fn hook(e: HookError, path: impl Into<String>) -> Self {
        let hook = match &e.field {
            Some(field) => format!("{} ({})", e.slot, field),
            None => e.slot.to_string(),
        };
        Self::Hook {
            entity: e.entity,
            hook,
            path: path.into(),
            message: e.message,
        }
    }
}

fn path_suffix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}
