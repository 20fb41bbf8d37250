//! Hook pipeline executor.

use bastion_core::{Data, FieldErrors, Identity, Operation, Record, Store};
use bastion_registry::{EntitySchema, HookArgs};
use tracing::trace;

use crate::error::{HookError, HookResult, HookSlot};

/// Runs declared hooks for one payload node at a time.
pub struct HookExecutor<'s> {
    store: &'s dyn Store,
}

/// The node a hook runs for.
#[derive(Debug, Clone, Copy)]
pub struct HookTarget<'a> {
    pub schema: &'a EntitySchema,
    pub operation: Operation,
    pub identity: Option<&'a Identity>,
    pub original_item: Option<&'a Record>,
    pub depth: usize,
}

impl<'s> HookExecutor<'s> {
    /// Create a new executor reading through `store`.
    pub fn new(store: &'s dyn Store) -> Self {
        Self { store }
    }

    fn args<'a>(&'a self, target: &HookTarget<'a>) -> HookArgs<'a> {
        HookArgs {
            entity: &target.schema.name,
            operation: target.operation,
            identity: target.identity,
            original_item: target.original_item,
            store: self.store,
            depth: target.depth,
        }
    }

    /// Run `resolve_input` and `validate_input` hooks over a node's input.
    ///
    /// Returns the resolved input. Validation messages land in `errors`
    /// with paths relative to this node; a raised error aborts.
    pub fn run_input_hooks(
        &self,
        target: &HookTarget<'_>,
        data: Data,
        errors: &mut FieldErrors,
    ) -> HookResult<Data> {
        let schema = target.schema;
        let args = self.args(target);
        let mut data = data;

        if let Some(hook) = &schema.hooks.resolve_input {
            trace!(target: "bastion::hooks", entity = %schema.name, "resolveInput");
            data = hook(&args, data)
                .map_err(|e| HookError::new(&schema.name, HookSlot::ResolveInput, e.message))?;
        }

        for field in schema.fields() {
            let Some(hook) = &field.hooks.resolve_input else {
                continue;
            };
            let Some(input) = data.remove(&field.name) else {
                continue;
            };
            trace!(target: "bastion::hooks", entity = %schema.name, field = %field.name, "field resolveInput");
            let resolved = hook(&args, input).map_err(|e| {
                HookError::new(&schema.name, HookSlot::FieldResolveInput, e.message)
                    .on_field(&field.name)
            })?;
            if let Some(resolved) = resolved {
                data.insert(field.name.clone(), resolved);
            }
        }

        if let Some(hook) = &schema.hooks.validate_input {
            trace!(target: "bastion::hooks", entity = %schema.name, "validateInput");
            let mut collected = FieldErrors::new();
            hook(&args, &data, &mut collected)
                .map_err(|e| HookError::new(&schema.name, HookSlot::ValidateInput, e.message))?;
            errors.merge(collected);
        }

        for field in schema.fields() {
            let (Some(hook), Some(input)) = (&field.hooks.validate_input, data.get(&field.name))
            else {
                continue;
            };
            let mut collected = FieldErrors::new();
            hook(&args, input, &mut collected).map_err(|e| {
                HookError::new(&schema.name, HookSlot::FieldValidateInput, e.message)
                    .on_field(&field.name)
            })?;
            errors.merge_prefixed(collected, &field.name);
        }

        Ok(data)
    }

    /// Run `validate_delete` for a record about to be deleted.
    pub fn validate_delete(&self, target: &HookTarget<'_>, errors: &mut FieldErrors) -> HookResult<()> {
        let schema = target.schema;
        if let Some(hook) = &schema.hooks.validate_delete {
            trace!(target: "bastion::hooks", entity = %schema.name, "validateDelete");
            hook(&self.args(target), errors)
                .map_err(|e| HookError::new(&schema.name, HookSlot::ValidateDelete, e.message))?;
        }
        Ok(())
    }

    /// Run `before_operation`. An error aborts the write.
    pub fn before_operation(&self, target: &HookTarget<'_>, data: Option<&Data>) -> HookResult<()> {
        let schema = target.schema;
        if let Some(hook) = &schema.hooks.before_operation {
            trace!(target: "bastion::hooks", entity = %schema.name, operation = %target.operation, "beforeOperation");
            hook(&self.args(target), data)
                .map_err(|e| HookError::new(&schema.name, HookSlot::BeforeOperation, e.message))?;
        }
        Ok(())
    }

    /// Run `after_operation` once the write has been persisted.
    pub fn after_operation(
        &self,
        target: &HookTarget<'_>,
        data: Option<&Data>,
        item: Option<&Record>,
    ) -> HookResult<()> {
        let schema = target.schema;
        if let Some(hook) = &schema.hooks.after_operation {
            trace!(target: "bastion::hooks", entity = %schema.name, operation = %target.operation, "afterOperation");
            hook(&self.args(target), data, item)
                .map_err(|e| HookError::new(&schema.name, HookSlot::AfterOperation, e.message))?;
        }
        Ok(())
    }
}
