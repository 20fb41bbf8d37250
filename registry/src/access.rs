//! Access rule declarations.
//!
//! Rules are declared per entity operation and per field access kind. A rule
//! is a closed variant: allow, deny, or a predicate over the caller and the
//! target record that answers with a boolean or a filter object.

use bastion_core::{
    CallbackResult, Data, FieldAccessKind, Filter, Identity, Operation, Record,
};
use std::fmt;
use std::sync::Arc;

/// Arguments handed to an access predicate.
#[derive(Debug, Clone, Copy)]
pub struct AccessArgs<'a> {
    /// Entity the rule belongs to.
    pub entity: &'a str,
    /// Entity-level operation being authorized.
    pub operation: Operation,
    /// Field and access kind, for field-level rules.
    pub field: Option<(&'a str, FieldAccessKind)>,
    pub identity: Option<&'a Identity>,
    /// The existing record, when one has been fetched.
    pub item: Option<&'a Record>,
    /// The incoming payload, for create and update.
    pub input: Option<&'a Data>,
}

impl<'a> AccessArgs<'a> {
    pub fn new(entity: &'a str, operation: Operation, identity: Option<&'a Identity>) -> Self {
        Self {
            entity,
            operation,
            field: None,
            identity,
            item: None,
            input: None,
        }
    }

    pub fn with_item(mut self, item: Option<&'a Record>) -> Self {
        self.item = item;
        self
    }

    pub fn with_input(mut self, input: Option<&'a Data>) -> Self {
        self.input = input;
        self
    }

    pub fn for_field(mut self, field: &'a str, kind: FieldAccessKind) -> Self {
        self.field = Some((field, kind));
        self
    }
}

/// What an access predicate answers.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessOutcome {
    Bool(bool),
    Filter(Filter),
}

impl From<bool> for AccessOutcome {
    fn from(b: bool) -> Self {
        AccessOutcome::Bool(b)
    }
}

impl From<Filter> for AccessOutcome {
    fn from(f: Filter) -> Self {
        AccessOutcome::Filter(f)
    }
}

/// Predicate signature for access rules.
pub type AccessFn = Arc<dyn Fn(&AccessArgs<'_>) -> CallbackResult<AccessOutcome> + Send + Sync>;

/// One declared access rule.
#[derive(Clone)]
pub enum AccessRule {
    Allow,
    Deny,
    Predicate(AccessFn),
}

impl AccessRule {
    /// A predicate that may answer with a boolean or a filter, and may fail.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&AccessArgs<'_>) -> CallbackResult<AccessOutcome> + Send + Sync + 'static,
    {
        AccessRule::Predicate(Arc::new(f))
    }

    /// A boolean predicate.
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&AccessArgs<'_>) -> bool + Send + Sync + 'static,
    {
        Self::predicate(move |args| Ok(AccessOutcome::Bool(f(args))))
    }

    /// A predicate that always answers with a filter.
    pub fn filter<F>(f: F) -> Self
    where
        F: Fn(&AccessArgs<'_>) -> Filter + Send + Sync + 'static,
    {
        Self::predicate(move |args| Ok(AccessOutcome::Filter(f(args))))
    }

    /// Allow any authenticated caller.
    pub fn authenticated() -> Self {
        Self::when(|args| args.identity.is_some())
    }
}

impl fmt::Debug for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRule::Allow => write!(f, "Allow"),
            AccessRule::Deny => write!(f, "Deny"),
            AccessRule::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Entity-level access rules, keyed by operation. `None` means unset.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub query: Option<AccessRule>,
    pub create: Option<AccessRule>,
    pub update: Option<AccessRule>,
    pub delete: Option<AccessRule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation explicitly allowed.
    pub fn allow_all() -> Self {
        Self {
            query: Some(AccessRule::Allow),
            create: Some(AccessRule::Allow),
            update: Some(AccessRule::Allow),
            delete: Some(AccessRule::Allow),
        }
    }

    pub fn query(mut self, rule: AccessRule) -> Self {
        self.query = Some(rule);
        self
    }

    pub fn create(mut self, rule: AccessRule) -> Self {
        self.create = Some(rule);
        self
    }

    pub fn update(mut self, rule: AccessRule) -> Self {
        self.update = Some(rule);
        self
    }

    pub fn delete(mut self, rule: AccessRule) -> Self {
        self.delete = Some(rule);
        self
    }

    /// The rule declared for an operation.
    pub fn rule(&self, operation: Operation) -> Option<&AccessRule> {
        match operation {
            Operation::Query => self.query.as_ref(),
            Operation::Create => self.create.as_ref(),
            Operation::Update => self.update.as_ref(),
            Operation::Delete => self.delete.as_ref(),
        }
    }
}

/// Field-level access rules, keyed by access kind. `None` means unset.
#[derive(Debug, Clone, Default)]
pub struct FieldAccess {
    pub read: Option<AccessRule>,
    pub create: Option<AccessRule>,
    pub update: Option<AccessRule>,
}

impl FieldAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, rule: AccessRule) -> Self {
        self.read = Some(rule);
        self
    }

    pub fn create(mut self, rule: AccessRule) -> Self {
        self.create = Some(rule);
        self
    }

    pub fn update(mut self, rule: AccessRule) -> Self {
        self.update = Some(rule);
        self
    }

    pub fn rule(&self, kind: FieldAccessKind) -> Option<&AccessRule> {
        match kind {
            FieldAccessKind::Read => self.read.as_ref(),
            FieldAccessKind::Create => self.create.as_ref(),
            FieldAccessKind::Update => self.update.as_ref(),
        }
    }
}
