//! The mutation pipeline: the single entry point for writes.
//!
//! A mutation runs in two phases:
//! 1. `resolve` authorizes, hooks, validates and field-filters the whole
//!    payload tree and fails atomically before anything is written.
//! 2. `commit` runs every `before_operation` hook, calls `Store::persist`
//!    exactly once with the resolved payload, then runs every
//!    `after_operation` hook.

use bastion_access::{AccessEvaluator, UnsetRulePolicy};
use bastion_core::{CancelToken, Identity, MutationRequest, Record, Store};
use bastion_hooks::HookExecutor;
use bastion_registry::Registry;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{MutationError, MutationResult};
use crate::processor::Processor;
use crate::result::ResolvedMutation;

/// Access-controlled nested mutation pipeline.
///
/// Holds only shared references; one pipeline can serve concurrent calls.
pub struct MutationPipeline<'r> {
    registry: &'r Registry,
    store: &'r dyn Store,
    config: PipelineConfig,
    access: AccessEvaluator,
}

impl<'r> MutationPipeline<'r> {
    pub fn new(registry: &'r Registry, store: &'r dyn Store, config: PipelineConfig) -> Self {
        let access = AccessEvaluator::new(config.unset_rule_policy());
        if access.unset_policy() == UnsetRulePolicy::Permissive {
            warn!(
                target: "bastion::access",
                "unset access rules allow every caller; set require_explicit_access to deny them"
            );
        }
        Self {
            registry,
            store,
            config,
            access,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The evaluator this pipeline applies, for read-side callers that need
    /// the same policy (e.g. `query_filter`).
    pub fn access(&self) -> &AccessEvaluator {
        &self.access
    }

    /// Apply one write to `entity`.
    ///
    /// Returns `Ok(None)` when the root record does not exist or the caller
    /// may not perform the root operation. Denials of nested operations are
    /// errors.
    pub fn mutate(
        &self,
        entity: &str,
        request: MutationRequest,
        identity: Option<&Identity>,
    ) -> MutationResult<Option<Record>> {
        self.mutate_with_cancel(entity, request, identity, &CancelToken::new())
    }

    /// Like `mutate`, aborting with `Cancelled` if `cancel` trips before a
    /// store fetch or before the persist call.
    pub fn mutate_with_cancel(
        &self,
        entity: &str,
        request: MutationRequest,
        identity: Option<&Identity>,
        cancel: &CancelToken,
    ) -> MutationResult<Option<Record>> {
        let Some(resolved) = self.resolve_with(entity, request, identity, cancel)? else {
            return Ok(None);
        };
        self.commit_with(resolved, identity, cancel).map(Some)
    }

    /// Phase one only: resolve the request without persisting anything.
    pub fn resolve(
        &self,
        entity: &str,
        request: MutationRequest,
        identity: Option<&Identity>,
    ) -> MutationResult<Option<ResolvedMutation<'r>>> {
        self.resolve_with(entity, request, identity, &CancelToken::new())
    }

    /// Phase two only: persist a resolved mutation and run its hooks.
    ///
    /// `identity` must be the identity the mutation was resolved for.
    pub fn commit(
        &self,
        resolved: ResolvedMutation<'r>,
        identity: Option<&Identity>,
    ) -> MutationResult<Record> {
        self.commit_with(resolved, identity, &CancelToken::new())
    }

    fn resolve_with(
        &self,
        entity: &str,
        request: MutationRequest,
        identity: Option<&Identity>,
        cancel: &CancelToken,
    ) -> MutationResult<Option<ResolvedMutation<'r>>> {
        let schema = self
            .registry
            .lookup_entity(entity)
            .ok_or_else(|| MutationError::unknown_entity(entity))?;

        debug!(
            target: "bastion::mutation",
            entity,
            operation = %request.operation(),
            "resolving mutation"
        );

        let processor = Processor {
            registry: self.registry,
            store: self.store,
            access: self.access,
            hooks: HookExecutor::new(self.store),
            identity,
            cancel,
            max_depth: self.config.max_depth,
        };
        processor.resolve_root(schema, request)
    }

    fn commit_with(
        &self,
        resolved: ResolvedMutation<'r>,
        identity: Option<&Identity>,
        cancel: &CancelToken,
    ) -> MutationResult<Record> {
        let hooks = HookExecutor::new(self.store);

        if cancel.is_cancelled() {
            return Err(MutationError::Cancelled);
        }
        for obligation in &resolved.obligations {
            hooks
                .before_operation(&obligation.hook_target(identity), obligation.data.as_ref())
                .map_err(|e| MutationError::hook(e, &obligation.path))?;
        }

        if cancel.is_cancelled() {
            debug!(target: "bastion::mutation", entity = %resolved.schema.name, "mutation cancelled before persist");
            return Err(MutationError::Cancelled);
        }

        debug!(
            target: "bastion::mutation",
            entity = %resolved.schema.name,
            operation = %resolved.request.operation(),
            nodes = resolved.obligations.len(),
            "persisting resolved mutation"
        );
        let record = self.store.persist(&resolved.schema.name, &resolved.request)?;

        for obligation in &resolved.obligations {
            let item = obligation.is_root().then_some(&record);
            hooks
                .after_operation(&obligation.hook_target(identity), obligation.data.as_ref(), item)
                .map_err(|e| MutationError::hook(e, &obligation.path))?;
        }

        if self.config.redact_unreadable_fields {
            return Ok(self.access.redact_unreadable(resolved.schema, record, identity)?);
        }
        Ok(record)
    }
}
