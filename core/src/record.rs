//! Stored records and unique key references.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A stored record: field name to value.
pub type Record = BTreeMap<String, Value>;

/// Reference to a single existing record by a unique field.
///
/// Nested `connect`, `update` and `disconnect` operations name their target
/// with a key, and the store resolves it with `Store::fetch_by_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    /// The unique field being matched (usually `id`).
    pub field: String,
    /// The value the field must equal.
    pub value: Value,
}

impl Key {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Key on the conventional `id` field.
    pub fn id(value: impl Into<Value>) -> Self {
        Self::new("id", value)
    }

    /// Check whether a record carries this key.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .map(|v| v.loosely_equals(&self.value))
            .unwrap_or(false)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

/// Helper macro to create records.
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Record::new();
            $(
                map.insert($key.to_string(), $crate::Value::from($value));
            )+
            map
        }
    };
}
