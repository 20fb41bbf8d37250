//! Access evaluation error types.

use thiserror::Error;

/// Result type for access evaluation.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised while evaluating access rules.
///
/// A throwing predicate is never treated as a denial; it is surfaced so the
/// enclosing mutation fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("access rule for {operation} on {entity} failed: {message}")]
    Predicate {
        entity: String,
        operation: String,
        message: String,
    },

    #[error("access rule for {kind} on {entity}.{field} failed: {message}")]
    FieldPredicate {
        entity: String,
        field: String,
        kind: String,
        message: String,
    },
}
