//! Hook declarations.
//!
//! Hooks are ordered callback slots on an entity and on each field. The
//! executor in `bastion-hooks` decides when each slot runs; this module only
//! describes their signatures.

use bastion_core::{CallbackResult, Data, FieldErrors, Identity, Input, Operation, Record, Store};
use std::fmt;
use std::sync::Arc;

/// Arguments handed to every hook.
#[derive(Clone, Copy)]
pub struct HookArgs<'a> {
    pub entity: &'a str,
    pub operation: Operation,
    pub identity: Option<&'a Identity>,
    /// The record as it was before this write (update and delete).
    pub original_item: Option<&'a Record>,
    /// Read access to the store, e.g. to look up related data.
    pub store: &'a dyn Store,
    /// Nesting depth of the node this hook runs for (root is 0).
    pub depth: usize,
}

impl fmt::Debug for HookArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookArgs")
            .field("entity", &self.entity)
            .field("operation", &self.operation)
            .field("identity", &self.identity)
            .field("original_item", &self.original_item)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Transforms a node's whole input.
pub type ResolveInputFn =
    Arc<dyn Fn(&HookArgs<'_>, Data) -> CallbackResult<Data> + Send + Sync>;

/// Transforms one field's input. Returning `None` removes the field.
pub type FieldResolveInputFn =
    Arc<dyn Fn(&HookArgs<'_>, Input) -> CallbackResult<Option<Input>> + Send + Sync>;

/// Validates a node's resolved input, reporting into the accumulator.
pub type ValidateInputFn =
    Arc<dyn Fn(&HookArgs<'_>, &Data, &mut FieldErrors) -> CallbackResult<()> + Send + Sync>;

/// Validates one field's resolved input. Paths are relative to the field.
pub type FieldValidateInputFn =
    Arc<dyn Fn(&HookArgs<'_>, &Input, &mut FieldErrors) -> CallbackResult<()> + Send + Sync>;

/// Validates a delete against the record about to be removed.
pub type ValidateDeleteFn =
    Arc<dyn Fn(&HookArgs<'_>, &mut FieldErrors) -> CallbackResult<()> + Send + Sync>;

/// Runs immediately before persistence; an error aborts the write.
pub type BeforeOperationFn =
    Arc<dyn Fn(&HookArgs<'_>, Option<&Data>) -> CallbackResult<()> + Send + Sync>;

/// Runs after a successful persist with the resolved input and, for the root
/// node, the persisted record.
pub type AfterOperationFn = Arc<
    dyn Fn(&HookArgs<'_>, Option<&Data>, Option<&Record>) -> CallbackResult<()> + Send + Sync,
>;

/// Entity-level hook slots.
#[derive(Clone, Default)]
pub struct HookSet {
    pub resolve_input: Option<ResolveInputFn>,
    pub validate_input: Option<ValidateInputFn>,
    pub validate_delete: Option<ValidateDeleteFn>,
    pub before_operation: Option<BeforeOperationFn>,
    pub after_operation: Option<AfterOperationFn>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, Data) -> CallbackResult<Data> + Send + Sync + 'static,
    {
        self.resolve_input = Some(Arc::new(f));
        self
    }

    pub fn validate_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, &Data, &mut FieldErrors) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.validate_input = Some(Arc::new(f));
        self
    }

    pub fn validate_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, &mut FieldErrors) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.validate_delete = Some(Arc::new(f));
        self
    }

    pub fn before_operation<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, Option<&Data>) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.before_operation = Some(Arc::new(f));
        self
    }

    pub fn after_operation<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, Option<&Data>, Option<&Record>) -> CallbackResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.after_operation = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("resolve_input", &self.resolve_input.is_some())
            .field("validate_input", &self.validate_input.is_some())
            .field("validate_delete", &self.validate_delete.is_some())
            .field("before_operation", &self.before_operation.is_some())
            .field("after_operation", &self.after_operation.is_some())
            .finish()
    }
}

/// Field-level hook slots.
#[derive(Clone, Default)]
pub struct FieldHooks {
    pub resolve_input: Option<FieldResolveInputFn>,
    pub validate_input: Option<FieldValidateInputFn>,
}

impl FieldHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, Input) -> CallbackResult<Option<Input>> + Send + Sync + 'static,
    {
        self.resolve_input = Some(Arc::new(f));
        self
    }

    pub fn validate_input<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookArgs<'_>, &Input, &mut FieldErrors) -> CallbackResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.validate_input = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for FieldHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHooks")
            .field("resolve_input", &self.resolve_input.is_some())
            .field("validate_input", &self.validate_input.is_some())
            .finish()
    }
}
