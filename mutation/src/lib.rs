//! Bastion Mutation
//!
//! The nested mutation processor and the `MutationPipeline` entry point.
//!
//! Responsibilities:
//! - Authorize the root operation, silently returning nothing on denial
//! - Authorize, hook, validate and field-filter every nested node
//! - Bound recursion on deep or cyclic relationship graphs
//! - Persist the fully resolved payload exactly once
//!
//! # Module Structure
//!
//! - `pipeline` - `MutationPipeline`, the two-phase entry point
//! - `processor` - Recursive payload walk shared by all nodes
//! - `ops/` - Nested operation handlers (create, connect, update)
//! - `result` - `ResolvedMutation` and its hook obligations
//! - `config` - `PipelineConfig`
//! - `error` - Error types for mutation failures

mod config;
mod error;
mod ops;
mod pipeline;
mod processor;
mod result;

pub use config::{ConfigError, PipelineConfig, DEFAULT_MAX_DEPTH};
pub use error::{MutationError, MutationResult};
pub use pipeline::MutationPipeline;
pub use result::{HookObligation, ResolvedMutation};
