//! Phase-one output: the resolved request and its pending hooks.

use bastion_core::{Data, Identity, MutationRequest, Operation, Record};
use bastion_hooks::HookTarget;
use bastion_registry::EntitySchema;

/// A hook call owed by one node of the payload tree once it is persisted.
#[derive(Debug, Clone)]
pub struct HookObligation<'r> {
    pub schema: &'r EntitySchema,
    pub operation: Operation,
    /// Dotted path of the node; empty for the root.
    pub path: String,
    pub depth: usize,
    /// The resolved input of the node (`None` for deletes).
    pub data: Option<Data>,
    /// The record as fetched before the write (updates and deletes).
    pub original_item: Option<Record>,
}

impl HookObligation<'_> {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub(crate) fn hook_target<'a>(&'a self, identity: Option<&'a Identity>) -> HookTarget<'a> {
        HookTarget {
            schema: self.schema,
            operation: self.operation,
            identity,
            original_item: self.original_item.as_ref(),
            depth: self.depth,
        }
    }
}

/// A fully authorized, hooked and validated mutation, ready to persist.
#[derive(Debug, Clone)]
pub struct ResolvedMutation<'r> {
    pub(crate) schema: &'r EntitySchema,
    pub(crate) request: MutationRequest,
    pub(crate) obligations: Vec<HookObligation<'r>>,
}

impl<'r> ResolvedMutation<'r> {
    pub fn entity(&self) -> &str {
        &self.schema.name
    }

    /// The request that will be handed to `Store::persist`.
    pub fn request(&self) -> &MutationRequest {
        &self.request
    }

    /// Hook obligations in execution order: nested nodes first, root last.
    pub fn obligations(&self) -> &[HookObligation<'r>] {
        &self.obligations
    }
}
