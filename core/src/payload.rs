//! Mutation payload tree.
//!
//! A payload is a map of field name to `Input`. Scalar fields carry a
//! `Value`; relationship fields carry a `RelationInput`, a list of nested
//! operations that may themselves contain further payloads.

use crate::{Filter, Key, Record, Value};
use std::collections::BTreeMap;

/// Input data for one entity node: field name to input.
pub type Data = BTreeMap<String, Input>;

/// One field's input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A scalar value.
    Value(Value),
    /// Nested writes against a related entity.
    Relation(RelationInput),
}

impl Input {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Input::Value(v) => Some(v),
            Input::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationInput> {
        match self {
            Input::Relation(r) => Some(r),
            Input::Value(_) => None,
        }
    }
}

impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Value(v)
    }
}

impl From<RelationInput> for Input {
    fn from(r: RelationInput) -> Self {
        Input::Relation(r)
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Input::Value(b.into())
    }
}

impl From<i64> for Input {
    fn from(i: i64) -> Self {
        Input::Value(i.into())
    }
}

impl From<i32> for Input {
    fn from(i: i32) -> Self {
        Input::Value(i.into())
    }
}

impl From<f64> for Input {
    fn from(f: f64) -> Self {
        Input::Value(f.into())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Value(s.into())
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Value(s.into())
    }
}

/// A single nested operation on a relationship field.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedOp {
    /// Create a related record from the nested payload.
    Create(Data),
    /// Link an existing record.
    Connect(Key),
    /// Link the keyed record if it exists, otherwise create it.
    ConnectOrCreate { key: Key, create: Data },
    /// Update a linked record in place.
    Update { key: Key, data: Data },
    /// Unlink a record.
    Disconnect(Key),
    /// Delete a linked record.
    Delete(Key),
    /// Delete every linked record matching the filter.
    DeleteMany(Filter),
    /// Replace the whole set of linked records.
    Set(Vec<Key>),
    /// Update every linked record matching the filter.
    UpdateMany { filter: Filter, data: Data },
}

impl NestedOp {
    /// Payload name of this operation, as it appears in error paths.
    pub fn name(&self) -> &'static str {
        match self {
            NestedOp::Create(_) => "create",
            NestedOp::Connect(_) => "connect",
            NestedOp::ConnectOrCreate { .. } => "connectOrCreate",
            NestedOp::Update { .. } => "update",
            NestedOp::Disconnect(_) => "disconnect",
            NestedOp::Delete(_) => "delete",
            NestedOp::DeleteMany(_) => "deleteMany",
            NestedOp::Set(_) => "set",
            NestedOp::UpdateMany { .. } => "updateMany",
        }
    }

    /// Whether this operation only makes sense on a to-many relationship.
    pub fn is_many_only(&self) -> bool {
        matches!(
            self,
            NestedOp::Set(_) | NestedOp::DeleteMany(_) | NestedOp::UpdateMany { .. }
        )
    }
}

/// The nested operations for one relationship field, applied in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationInput {
    pub ops: Vec<NestedOp>,
}

impl RelationInput {
    pub fn new(ops: Vec<NestedOp>) -> Self {
        Self { ops }
    }

    pub fn create(data: Data) -> Self {
        Self::new(vec![NestedOp::Create(data)])
    }

    pub fn connect(key: Key) -> Self {
        Self::new(vec![NestedOp::Connect(key)])
    }

    pub fn connect_or_create(key: Key, create: Data) -> Self {
        Self::new(vec![NestedOp::ConnectOrCreate { key, create }])
    }

    pub fn update(key: Key, data: Data) -> Self {
        Self::new(vec![NestedOp::Update { key, data }])
    }

    pub fn disconnect(key: Key) -> Self {
        Self::new(vec![NestedOp::Disconnect(key)])
    }

    pub fn set(keys: Vec<Key>) -> Self {
        Self::new(vec![NestedOp::Set(keys)])
    }

    /// Append another operation (to-many relationships).
    pub fn and(mut self, op: NestedOp) -> Self {
        self.ops.push(op);
        self
    }
}

/// A top-level write request against one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    Create { data: Data },
    Update { key: Key, data: Data },
    Delete { key: Key },
}

impl MutationRequest {
    pub fn create(data: Data) -> Self {
        MutationRequest::Create { data }
    }

    pub fn update(key: Key, data: Data) -> Self {
        MutationRequest::Update { key, data }
    }

    pub fn delete(key: Key) -> Self {
        MutationRequest::Delete { key }
    }

    pub fn operation(&self) -> crate::Operation {
        match self {
            MutationRequest::Create { .. } => crate::Operation::Create,
            MutationRequest::Update { .. } => crate::Operation::Update,
            MutationRequest::Delete { .. } => crate::Operation::Delete,
        }
    }

    pub fn data(&self) -> Option<&Data> {
        match self {
            MutationRequest::Create { data } | MutationRequest::Update { data, .. } => Some(data),
            MutationRequest::Delete { .. } => None,
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            MutationRequest::Create { .. } => None,
            MutationRequest::Update { key, .. } | MutationRequest::Delete { key } => Some(key),
        }
    }
}

/// Project the scalar fields of a payload into a record.
///
/// Relationship inputs are skipped.
pub fn scalar_view(data: &Data) -> Record {
    data.iter()
        .filter_map(|(name, input)| input.as_value().map(|v| (name.clone(), v.clone())))
        .collect()
}

/// Helper macro to create payload data.
#[macro_export]
macro_rules! data {
    () => {
        $crate::Data::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Data::new();
            $(
                map.insert($key.to_string(), $crate::Input::from($value));
            )+
            map
        }
    };
}
