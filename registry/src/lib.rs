//! Bastion Registry
//!
//! Declarative entity schemas: fields, relationships, access policies and
//! hooks. Schemas are assembled with `RegistryBuilder` at configuration load
//! and frozen into an immutable `Registry` that every pipeline call borrows.

mod access;
mod builder;
mod hooks;
mod registry;
mod types;

pub use access::*;
pub use builder::*;
pub use hooks::*;
pub use registry::*;
pub use types::*;
