//! Nested mutation processor.
//!
//! Phase one of a mutation: walks the payload tree once, authorizing,
//! hooking, validating and field-filtering every node it reaches, and
//! records the hook calls owed after persistence. Nothing here writes.

use bastion_access::AccessEvaluator;
use bastion_constraint::{apply_defaults, validate_node};
use bastion_core::{
    join_path, CancelToken, Data, FieldErrors, Identity, Input, Key, MutationRequest, Operation,
    Record, RelationInput, Store,
};
use bastion_hooks::{HookExecutor, HookTarget};
use bastion_registry::{EntitySchema, FieldSchema, Registry, Relationship};
use tracing::{debug, trace};

use crate::error::{MutationError, MutationResult};
use crate::result::{HookObligation, ResolvedMutation};

/// Per-call processor. `'r` borrows the pipeline's registry and store, `'c`
/// borrows the caller's identity and cancel token.
pub(crate) struct Processor<'r, 'c> {
    pub(crate) registry: &'r Registry,
    pub(crate) store: &'r dyn Store,
    pub(crate) access: AccessEvaluator,
    pub(crate) hooks: HookExecutor<'r>,
    pub(crate) identity: Option<&'c Identity>,
    pub(crate) cancel: &'c CancelToken,
    pub(crate) max_depth: usize,
}

/// State accumulated over one walk of the payload tree.
#[derive(Default)]
pub(crate) struct Walk<'r> {
    pub(crate) errors: FieldErrors,
    pub(crate) obligations: Vec<HookObligation<'r>>,
}

/// A create or update node about to be prepared.
pub(crate) struct NodeContext<'r> {
    pub(crate) schema: &'r EntitySchema,
    pub(crate) operation: Operation,
    pub(crate) original_item: Option<Record>,
    pub(crate) depth: usize,
    pub(crate) path: String,
}

impl<'r, 'c> Processor<'r, 'c> {
    /// Resolve a root request.
    ///
    /// Returns `None` when the root record does not exist or the caller may
    /// not perform the root operation; the two cases are indistinguishable.
    pub(crate) fn resolve_root(
        &self,
        schema: &'r EntitySchema,
        request: MutationRequest,
    ) -> MutationResult<Option<ResolvedMutation<'r>>> {
        let mut walk = Walk::default();

        let request = match request {
            MutationRequest::Create { data } => {
                if !self.access.check_entity(
                    schema,
                    Operation::Create,
                    self.identity,
                    None,
                    Some(&data),
                )? {
                    return Ok(self.silent_denial(schema, Operation::Create));
                }
                let node = NodeContext::root(schema, Operation::Create, None);
                let data = self.prepare_node(node, data, &mut walk)?;
                MutationRequest::Create { data }
            }
            MutationRequest::Update { key, data } => {
                let Some(item) = self.fetch(schema, &key)? else {
                    return Ok(self.silent_denial(schema, Operation::Update));
                };
                if !self.access.check_entity(
                    schema,
                    Operation::Update,
                    self.identity,
                    Some(&item),
                    Some(&data),
                )? {
                    return Ok(self.silent_denial(schema, Operation::Update));
                }
                let node = NodeContext::root(schema, Operation::Update, Some(item));
                let data = self.prepare_node(node, data, &mut walk)?;
                MutationRequest::Update { key, data }
            }
            MutationRequest::Delete { key } => {
                let Some(item) = self.fetch(schema, &key)? else {
                    return Ok(self.silent_denial(schema, Operation::Delete));
                };
                if !self.access.check_entity(
                    schema,
                    Operation::Delete,
                    self.identity,
                    Some(&item),
                    None,
                )? {
                    return Ok(self.silent_denial(schema, Operation::Delete));
                }
                let target = HookTarget {
                    schema,
                    operation: Operation::Delete,
                    identity: self.identity,
                    original_item: Some(&item),
                    depth: 0,
                };
                self.hooks
                    .validate_delete(&target, &mut walk.errors)
                    .map_err(|e| MutationError::hook(e, ""))?;
                walk.obligations.push(HookObligation {
                    schema,
                    operation: Operation::Delete,
                    path: String::new(),
                    depth: 0,
                    data: None,
                    original_item: Some(item),
                });
                MutationRequest::Delete { key }
            }
        };

        if !walk.errors.is_empty() {
            debug!(
                target: "bastion::mutation",
                entity = %schema.name,
                errors = walk.errors.len(),
                "validation failed"
            );
            return Err(MutationError::ValidationFailed(walk.errors));
        }

        Ok(Some(ResolvedMutation {
            schema,
            request,
            obligations: walk.obligations,
        }))
    }

    /// Run hooks, validation and field-write filtering on one node, then
    /// recurse into its relationship fields.
    pub(crate) fn prepare_node(
        &self,
        node: NodeContext<'r>,
        data: Data,
        walk: &mut Walk<'r>,
    ) -> MutationResult<Data> {
        let NodeContext {
            schema,
            operation,
            original_item,
            depth,
            path,
        } = node;

        let mut data = data;
        if operation == Operation::Create {
            apply_defaults(schema, &mut data);
        }

        let target = HookTarget {
            schema,
            operation,
            identity: self.identity,
            original_item: original_item.as_ref(),
            depth,
        };
        let mut node_errors = FieldErrors::new();
        let data = self
            .hooks
            .run_input_hooks(&target, data, &mut node_errors)
            .map_err(|e| MutationError::hook(e, &path))?;
        node_errors.merge(validate_node(schema, &data, operation));
        walk.errors.merge_prefixed(node_errors, &path);

        let (data, _denied) = self.access.filter_writable(
            schema,
            operation,
            data,
            self.identity,
            original_item.as_ref(),
        )?;

        let data = self.process(schema, data, depth, &path, walk)?;

        walk.obligations.push(HookObligation {
            schema,
            operation,
            path,
            depth,
            data: Some(data.clone()),
            original_item,
        });
        Ok(data)
    }

    /// Process every relationship field of a node at `depth`.
    ///
    /// Nested operations are handled at `depth + 1`. Once `depth` reaches the
    /// bound the subtree is returned as given.
    pub(crate) fn process(
        &self,
        schema: &'r EntitySchema,
        data: Data,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<Data> {
        if depth >= self.max_depth {
            if data.values().any(|input| input.as_relation().is_some()) {
                debug!(
                    target: "bastion::mutation",
                    entity = %schema.name,
                    depth,
                    path,
                    "depth bound reached, passing nested input through unchecked"
                );
            }
            return Ok(data);
        }

        let mut resolved = Data::new();
        for (name, input) in data {
            let input = match input {
                Input::Relation(relation) => {
                    match schema.field(&name).and_then(FieldSchema::as_relationship) {
                        Some(relationship) => {
                            let field_path = join_path(path, &name);
                            Input::Relation(self.process_relation(
                                relationship,
                                relation,
                                depth + 1,
                                &field_path,
                                walk,
                            )?)
                        }
                        None => Input::Relation(relation),
                    }
                }
                scalar => scalar,
            };
            resolved.insert(name, input);
        }
        Ok(resolved)
    }

    fn process_relation(
        &self,
        relationship: &Relationship,
        relation: RelationInput,
        depth: usize,
        path: &str,
        walk: &mut Walk<'r>,
    ) -> MutationResult<RelationInput> {
        crate::ops::check_shape(relationship, &relation, path)?;
        let target = self
            .registry
            .lookup_entity(&relationship.target)
            .ok_or_else(|| MutationError::unknown_entity(&relationship.target))?;

        let indexed = relation.ops.len() > 1;
        let mut ops = Vec::with_capacity(relation.ops.len());
        for (index, op) in relation.ops.into_iter().enumerate() {
            let op_path = if indexed {
                join_path(path, &format!("{}.{}", index, op.name()))
            } else {
                join_path(path, op.name())
            };
            ops.push(self.process_op(target, op, depth, &op_path, walk)?);
        }
        Ok(RelationInput::new(ops))
    }

    /// Fetch a record, observing the cancel token on both sides of the call.
    pub(crate) fn fetch(&self, schema: &EntitySchema, key: &Key) -> MutationResult<Option<Record>> {
        self.ensure_live()?;
        let record = self.store.fetch_by_key(&schema.name, key)?;
        self.ensure_live()?;
        trace!(
            target: "bastion::mutation",
            entity = %schema.name,
            key = %key,
            found = record.is_some(),
            "fetched record"
        );
        Ok(record)
    }

    pub(crate) fn ensure_live(&self) -> MutationResult<()> {
        if self.cancel.is_cancelled() {
            debug!(target: "bastion::mutation", "mutation cancelled");
            return Err(MutationError::Cancelled);
        }
        Ok(())
    }

    fn silent_denial(
        &self,
        schema: &EntitySchema,
        operation: Operation,
    ) -> Option<ResolvedMutation<'r>> {
        debug!(
            target: "bastion::mutation",
            entity = %schema.name,
            operation = %operation,
            "root operation denied or record missing, returning no result"
        );
        None
    }
}

impl<'r> NodeContext<'r> {
    pub(crate) fn root(
        schema: &'r EntitySchema,
        operation: Operation,
        original_item: Option<Record>,
    ) -> Self {
        Self {
            schema,
            operation,
            original_item,
            depth: 0,
            path: String::new(),
        }
    }
}
