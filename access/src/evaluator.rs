//! Access rule evaluation.

use bastion_core::{Data, FieldAccessKind, Identity, Operation, Record};
use bastion_registry::{AccessArgs, AccessOutcome, AccessRule, EntitySchema};
use tracing::{debug, trace};

use crate::decision::{Decision, QueryAccess};
use crate::error::{AccessError, AccessResult};

/// What an unset rule means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsetRulePolicy {
    /// Unset rules allow the operation.
    #[default]
    Permissive,
    /// Unset rules deny the operation; every allowance must be declared.
    Explicit,
}

/// Evaluates declared access rules.
///
/// The evaluator is stateless apart from its unset-rule policy and only reads
/// the records passed to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessEvaluator {
    unset: UnsetRulePolicy,
}

impl AccessEvaluator {
    pub fn new(unset: UnsetRulePolicy) -> Self {
        Self { unset }
    }

    pub fn unset_policy(&self) -> UnsetRulePolicy {
        self.unset
    }

    /// Evaluate a rule for the given arguments.
    pub fn evaluate(&self, rule: Option<&AccessRule>, args: &AccessArgs<'_>) -> AccessResult<Decision> {
        let decision = match rule {
            None => match self.unset {
                UnsetRulePolicy::Permissive => {
                    trace!(
                        target: "bastion::access",
                        entity = args.entity,
                        operation = %args.operation,
                        field = ?args.field.map(|(f, _)| f),
                        "no access rule declared, allowing"
                    );
                    Decision::Allow
                }
                UnsetRulePolicy::Explicit => Decision::Deny,
            },
            Some(AccessRule::Allow) => Decision::Allow,
            Some(AccessRule::Deny) => Decision::Deny,
            Some(AccessRule::Predicate(f)) => match f(args) {
                Ok(AccessOutcome::Bool(true)) => Decision::Allow,
                Ok(AccessOutcome::Bool(false)) => Decision::Deny,
                Ok(AccessOutcome::Filter(filter)) => Decision::Conditional(filter),
                Err(e) => return Err(predicate_error(args, e.message)),
            },
        };
        trace!(
            target: "bastion::access",
            entity = args.entity,
            operation = %args.operation,
            decision = ?decision,
            "access rule evaluated"
        );
        Ok(decision)
    }

    /// Evaluate an entity-level rule.
    pub fn entity_decision(
        &self,
        schema: &EntitySchema,
        operation: Operation,
        identity: Option<&Identity>,
        item: Option<&Record>,
        input: Option<&Data>,
    ) -> AccessResult<Decision> {
        let args = AccessArgs::new(&schema.name, operation, identity)
            .with_item(item)
            .with_input(input);
        self.evaluate(schema.access.rule(operation), &args)
    }

    /// Evaluate an entity-level rule and resolve a filter against `item`.
    pub fn check_entity(
        &self,
        schema: &EntitySchema,
        operation: Operation,
        identity: Option<&Identity>,
        item: Option<&Record>,
        input: Option<&Data>,
    ) -> AccessResult<bool> {
        let decision = self.entity_decision(schema, operation, identity, item, input)?;
        let allowed = decision.permits(item);
        debug!(
            target: "bastion::access",
            entity = %schema.name,
            operation = %operation,
            allowed,
            "entity access checked"
        );
        Ok(allowed)
    }

    /// The constraint a read-side caller must apply to queries on `schema`.
    pub fn query_filter(
        &self,
        schema: &EntitySchema,
        identity: Option<&Identity>,
    ) -> AccessResult<QueryAccess> {
        self.entity_decision(schema, Operation::Query, identity, None, None)
            .map(QueryAccess::from)
    }

    /// Whether the caller holds `kind` access to one field.
    ///
    /// Filters from field rules are tested against `item`; with no item they
    /// deny.
    #[allow(clippy::too_many_arguments)]
    pub fn field_allowed(
        &self,
        schema: &EntitySchema,
        field: &str,
        kind: FieldAccessKind,
        operation: Operation,
        identity: Option<&Identity>,
        item: Option<&Record>,
        input: Option<&Data>,
    ) -> AccessResult<bool> {
        let Some(field_schema) = schema.field(field) else {
            return Ok(false);
        };
        let args = AccessArgs::new(&schema.name, operation, identity)
            .for_field(field, kind)
            .with_item(item)
            .with_input(input);
        let decision = self.evaluate(field_schema.access.rule(kind), &args)?;
        Ok(decision.permits(item))
    }

    /// Drop every field of `data` the caller may not write.
    ///
    /// Returns the filtered data and the names of the removed fields. Unknown
    /// fields are left for the validator to report.
    pub fn filter_writable(
        &self,
        schema: &EntitySchema,
        operation: Operation,
        data: Data,
        identity: Option<&Identity>,
        item: Option<&Record>,
    ) -> AccessResult<(Data, Vec<String>)> {
        let Some(kind) = operation.field_write_kind() else {
            return Ok((data, Vec::new()));
        };

        let mut denied = Vec::new();
        for name in data.keys() {
            if !schema.has_field(name) {
                continue;
            }
            if !self.field_allowed(schema, name, kind, operation, identity, item, Some(&data))? {
                denied.push(name.clone());
            }
        }

        let mut data = data;
        for name in &denied {
            data.remove(name);
            debug!(
                target: "bastion::access",
                entity = %schema.name,
                field = %name,
                kind = %kind,
                "field write denied, dropping from input"
            );
        }
        Ok((data, denied))
    }

    /// Remove fields of a returned record the caller may not read.
    pub fn redact_unreadable(
        &self,
        schema: &EntitySchema,
        record: Record,
        identity: Option<&Identity>,
    ) -> AccessResult<Record> {
        let mut hidden = Vec::new();
        for name in record.keys() {
            if !schema.has_field(name) {
                continue;
            }
            let readable = self.field_allowed(
                schema,
                name,
                FieldAccessKind::Read,
                Operation::Query,
                identity,
                Some(&record),
                None,
            )?;
            if !readable {
                hidden.push(name.clone());
            }
        }

        let mut record = record;
        for name in hidden {
            record.remove(&name);
        }
        Ok(record)
    }
}

fn predicate_error(args: &AccessArgs<'_>, message: String) -> AccessError {
    match args.field {
        Some((field, kind)) => AccessError::FieldPredicate {
            entity: args.entity.to_string(),
            field: field.to_string(),
            kind: kind.to_string(),
            message,
        },
        None => AccessError::Predicate {
            entity: args.entity.to_string(),
            operation: args.operation.to_string(),
            message,
        },
    }
}
