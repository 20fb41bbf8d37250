//! Caller identity and operation kinds.

use crate::{Record, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session data for an authenticated caller.
///
/// The pipeline never inspects an identity itself; it is handed unmodified to
/// access predicates and hooks. An anonymous caller is `None` at every call
/// site that accepts `Option<&Identity>`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier (e.g. the user id).
    pub id: String,
    /// Arbitrary session claims (roles, tenant, flags).
    pub claims: Record,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claims: Record::new(),
        }
    }

    /// Attach a claim.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Look up a claim.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// True when the named claim is `Bool(true)`.
    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.claims.get(name), Some(Value::Bool(true)))
    }
}

/// Entity-level operation an access rule is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Query,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// The field-level access kind governing writes for this operation.
    pub fn field_write_kind(&self) -> Option<FieldAccessKind> {
        match self {
            Operation::Create => Some(FieldAccessKind::Create),
            Operation::Update => Some(FieldAccessKind::Update),
            Operation::Query | Operation::Delete => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level access kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAccessKind {
    Read,
    Create,
    Update,
}

impl FieldAccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldAccessKind::Read => "read",
            FieldAccessKind::Create => "create",
            FieldAccessKind::Update => "update",
        }
    }
}

impl fmt::Display for FieldAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
