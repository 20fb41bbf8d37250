//! Nested connect and connectOrCreate.
//!
//! Connecting is authorized as an `update` of the referenced record, since
//! it mutates the relationship.

use bastion_core::{join_path, Data, Key, NestedOp, Operation, Record};
use bastion_registry::EntitySchema;

use crate::error::{MutationError, MutationResult};
use crate::processor::{Processor, Walk};

impl<'r, 'c> Processor<'r, 'c> {
    /// Connect an existing record. A missing record is reported as not found.
    pub(crate) fn nested_connect(
        &self,
        target: &'r EntitySchema,
        key: Key,
        path: &str,
    ) -> MutationResult<Key> {
        let Some(record) = self.fetch(target, &key)? else {
            return Err(MutationError::not_found(&target.name, key));
        };
        self.authorize_connect(target, &record, path)?;
        Ok(key)
    }

    /// Check connect access on the record if it exists, then satisfy the
    /// creation branch too.
    ///
    /// When the record exists the creation branch is still authorized,
    /// hooked and validated, but its hook obligations are discarded: no
    /// create will be persisted for it.
    pub(crate) fn nested_connect_or_create(
        &self,
        target: &'r EntitySchema,
        key: Key,
        create: Data,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<NestedOp> {
        let create_path = join_path(path, "create");
        let Some(record) = self.fetch(target, &key)? else {
            let create = self.nested_create(target, create, depth, &create_path, walk)?;
            return Ok(NestedOp::ConnectOrCreate { key, create });
        };

        self.authorize_connect(target, &record, &join_path(path, "connect"))?;
        let mut scratch = Walk::default();
        let create = self.nested_create(target, create, depth, &create_path, &mut scratch)?;
        walk.errors.merge(scratch.errors);
        Ok(NestedOp::ConnectOrCreate { key, create })
    }

    fn authorize_connect(
        &self,
        target: &EntitySchema,
        record: &Record,
        path: &str,
    ) -> MutationResult<()> {
        let allowed =
            self.access
                .check_entity(target, Operation::Update, self.identity, Some(record), None)?;
        if !allowed {
            return Err(MutationError::access_denied(&target.name, Operation::Update, path));
        }
        Ok(())
    }
}
