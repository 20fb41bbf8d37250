//! Bastion Hooks
//!
//! The hook pipeline executor. For a create or update node it runs, over a
//! working copy of the input:
//!
//! 1. entity-level `resolve_input`
//! 2. field-level `resolve_input`, per present field, in declaration order
//! 3. entity-level `validate_input`, then field-level `validate_input`
//!
//! Validation messages are collected, never fail-fast. Persistence-time
//! slots (`validate_delete`, `before_operation`, `after_operation`) are
//! exposed separately so the mutation pipeline can run them around its
//! single persist call.

mod error;
mod executor;

pub use error::{HookError, HookResult, HookSlot};
pub use executor::{HookExecutor, HookTarget};
