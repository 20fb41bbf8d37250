//! Hook error types.

use std::fmt;
use thiserror::Error;

/// Result type for hook execution.
pub type HookResult<T> = Result<T, HookError>;

/// The hook slot an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSlot {
    ResolveInput,
    FieldResolveInput,
    ValidateInput,
    FieldValidateInput,
    ValidateDelete,
    BeforeOperation,
    AfterOperation,
}

impl fmt::Display for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookSlot::ResolveInput => "resolveInput",
            HookSlot::FieldResolveInput => "field resolveInput",
            HookSlot::ValidateInput => "validateInput",
            HookSlot::FieldValidateInput => "field validateInput",
            HookSlot::ValidateDelete => "validateDelete",
            HookSlot::BeforeOperation => "beforeOperation",
            HookSlot::AfterOperation => "afterOperation",
        };
        f.write_str(name)
    }
}

/// A hook raised an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{slot} hook on {entity}{} failed: {message}", field_suffix(.field))]
pub struct HookError {
    pub entity: String,
    pub field: Option<String>,
    pub slot: HookSlot,
    pub message: String,
}

impl HookError {
    pub fn new(entity: impl Into<String>, slot: HookSlot, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            field: None,
            slot,
            message: message.into(),
        }
    }

    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

fn field_suffix(field: &Option<String>) -> String {
    field.as_ref().map(|f| format!(".{}", f)).unwrap_or_default()
}
