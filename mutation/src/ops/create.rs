//! Nested create.

use bastion_core::{Data, Operation};
use bastion_registry::EntitySchema;

use crate::error::{MutationError, MutationResult};
use crate::processor::{NodeContext, Processor, Walk};

impl<'r, 'c> Processor<'r, 'c> {
    /// Authorize a nested create on identity alone, then prepare its payload.
    ///
    /// A denial is fatal for the whole mutation.
    pub(crate) fn nested_create(
        &self,
        target: &'r EntitySchema,
        data: Data,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<Data> {
        let allowed =
            self.access
                .check_entity(target, Operation::Create, self.identity, None, Some(&data))?;
        if !allowed {
            return Err(MutationError::access_denied(&target.name, Operation::Create, path));
        }

        let node = NodeContext {
            schema: target,
            operation: Operation::Create,
            original_item: None,
            depth,
            path: path.to_string(),
        };
        self.prepare_node(node, data, walk)
    }
}
