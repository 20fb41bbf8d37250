//! Bastion Access
//!
//! The access evaluator: turns a declared `AccessRule`, a caller identity and
//! an optional target record into a `Decision`.
//!
//! # Module Structure
//!
//! - `decision` - The `Decision` variant and in-memory filter resolution
//! - `evaluator` - Rule evaluation, unset-rule policy, field write filtering
//! - `error` - Errors raised by throwing predicates

mod decision;
mod error;
mod evaluator;

pub use decision::{Decision, QueryAccess};
pub use error::{AccessError, AccessResult};
pub use evaluator::{AccessEvaluator, UnsetRulePolicy};
