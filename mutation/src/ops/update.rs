//! Nested update-in-place.

use bastion_core::{Data, Key, NestedOp, Operation};
use bastion_registry::EntitySchema;

use crate::error::{MutationError, MutationResult};
use crate::processor::{NodeContext, Processor, Walk};

impl<'r, 'c> Processor<'r, 'c> {
    pub(crate) fn nested_update(
        &self,
        target: &'r EntitySchema,
        key: Key,
        data: Data,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<NestedOp> {
        let Some(record) = self.fetch(target, &key)? else {
            return Err(MutationError::not_found(&target.name, key));
        };

        let allowed = self.access.check_entity(
            target,
            Operation::Update,
            self.identity,
            Some(&record),
            Some(&data),
        )?;
        if !allowed {
            return Err(MutationError::access_denied(&target.name, Operation::Update, path));
        }

        let node = NodeContext {
            schema: target,
            operation: Operation::Update,
            original_item: Some(record),
            depth,
            path: path.to_string(),
        };
        let data = self.prepare_node(node, data, walk)?;
        Ok(NestedOp::Update { key, data })
    }
}
