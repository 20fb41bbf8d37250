//! Nested operation handlers.
//!
//! Each nested operation that carries access or hook obligations is handled
//! in its own module:
//! - `create` - create (and the creation branch of connectOrCreate)
//! - `connect` - connect and connectOrCreate
//! - `update` - update-in-place
//!
//! `disconnect`, `delete`, `deleteMany`, `set` and `updateMany` are handed
//! to the store as given. Their enforcement belongs to the target entity's
//! own delete/update path.

mod connect;
mod create;
mod update;

use bastion_core::{join_path, NestedOp, RelationInput};
use bastion_registry::{EntitySchema, Relationship};
use tracing::trace;

use crate::error::{MutationError, MutationResult};
use crate::processor::{Processor, Walk};

impl<'r, 'c> Processor<'r, 'c> {
    /// Handle one nested operation against `target` at `depth`.
    pub(crate) fn process_op(
        &self,
        target: &'r EntitySchema,
        op: NestedOp,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<NestedOp> {
        match op {
            NestedOp::Create(data) => self
                .nested_create(target, data, depth, path, walk)
                .map(NestedOp::Create),
            NestedOp::Connect(key) => self.nested_connect(target, key, path).map(NestedOp::Connect),
            NestedOp::ConnectOrCreate { key, create } => {
                self.nested_connect_or_create(target, key, create, depth, path, walk)
            }
            NestedOp::Update { key, data } => self.nested_update(target, key, data, depth, path, walk),
            passthrough => {
                trace!(
                    target: "bastion::mutation",
                    entity = %target.name,
                    op = passthrough.name(),
                    path,
                    "passing nested operation through"
                );
                Ok(passthrough)
            }
        }
    }
}

/// Reject nested input whose shape does not fit the relationship.
pub(crate) fn check_shape(
    relationship: &Relationship,
    relation: &RelationInput,
    path: &str,
) -> MutationResult<()> {
    if relationship.is_many() {
        return Ok(());
    }
    if relation.ops.len() > 1 {
        return Err(MutationError::invalid_nested_input(
            path,
            format!(
                "to-one relationship to {} accepts a single nested operation, got {}",
                relationship.target,
                relation.ops.len()
            ),
        ));
    }
    if let Some(op) = relation.ops.iter().find(|op| op.is_many_only()) {
        return Err(MutationError::invalid_nested_input(
            join_path(path, op.name()),
            format!("{} requires a to-many relationship", op.name()),
        ));
    }
    Ok(())
}
