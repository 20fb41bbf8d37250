//! Bastion Core Types
//!
//! This crate provides the foundational types shared by every stage of the
//! mutation pipeline:
//! - Scalar values and records (Value, Record, Key)
//! - Caller identity and operation kinds (Identity, Operation, FieldAccessKind)
//! - Filter objects with in-memory matching (Filter, Condition)
//! - The mutation payload tree (Data, Input, RelationInput, NestedOp)
//! - Field error collection (FieldError, FieldErrors)
//! - The external store seam (Store, StoreError) and cancellation

mod cancel;
mod error;
mod filter;
mod identity;
mod payload;
mod record;
mod store;
mod value;
mod violation;

pub use cancel::*;
pub use error::*;
pub use filter::*;
pub use identity::*;
pub use payload::*;
pub use record::*;
pub use store::*;
pub use value::*;
pub use violation::*;
