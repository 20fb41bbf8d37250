//! Bastion Constraint
//!
//! The schema validator: checks candidate field values against their declared
//! constraints and reports field-scoped errors. Pure and stateless; it never
//! fails fast and never raises, callers aggregate what it collects.

mod validator;

pub use validator::{apply_defaults, validate_field, validate_node};
