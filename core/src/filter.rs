//! Filter objects.
//!
//! A filter is a structured partial predicate over a record's fields. Access
//! rules return filters; read-side callers merge them into their store
//! queries, while the mutation pipeline evaluates them in memory against a
//! record it has already fetched. Evaluation is conjunctive across a field's
//! conditions, and `And`/`Or`/`Not` nest structurally.

use crate::{Record, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single comparison applied to one field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Equals(Value),
    Not(Box<Condition>),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Lt(Value),
    Lte(Value),
    Gt(Value),
    Gte(Value),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

impl Condition {
    /// Test a field value. A missing field is evaluated as `Null`.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Condition::Equals(expected) => value.loosely_equals(expected),
            Condition::Not(inner) => !inner.test(value),
            Condition::In(values) => values.iter().any(|v| value.loosely_equals(v)),
            Condition::NotIn(values) => !values.iter().any(|v| value.loosely_equals(v)),
            Condition::Lt(bound) => value.compare(bound) == Some(Ordering::Less),
            Condition::Lte(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::Gt(bound) => value.compare(bound) == Some(Ordering::Greater),
            Condition::Gte(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Contains(needle) => value.as_str().is_some_and(|s| s.contains(needle.as_str())),
            Condition::StartsWith(prefix) => {
                value.as_str().is_some_and(|s| s.starts_with(prefix.as_str()))
            }
            Condition::EndsWith(suffix) => {
                value.as_str().is_some_and(|s| s.ends_with(suffix.as_str()))
            }
        }
    }
}

/// A structured predicate over a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Every condition must hold for the named field.
    Field {
        field: String,
        conditions: Vec<Condition>,
    },
    /// Every sub-filter must match. An empty `And` matches everything.
    And(Vec<Filter>),
    /// At least one sub-filter must match. An empty `Or` matches nothing.
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Filter on one field with a single condition.
    pub fn field(field: impl Into<String>, condition: Condition) -> Self {
        Filter::Field {
            field: field.into(),
            conditions: vec![condition],
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(field, Condition::Equals(value.into()))
    }

    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    pub fn negate(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Add another condition on the same field.
    ///
    /// Only meaningful on `Filter::Field`; other variants are returned as-is.
    pub fn and_condition(mut self, condition: Condition) -> Self {
        if let Filter::Field { conditions, .. } = &mut self {
            conditions.push(condition);
        }
        self
    }

    /// Evaluate the filter against a concrete record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Field { field, conditions } => {
                let value = record.get(field).unwrap_or(&Value::Null);
                conditions.iter().all(|c| c.test(value))
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(record)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(record)),
            Filter::Not(filter) => !filter.matches(record),
        }
    }
}
