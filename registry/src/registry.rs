//! The Registry - immutable schema lookup.

use crate::EntitySchema;
use std::collections::HashMap;

/// The Registry provides runtime lookup of entity schemas.
/// It is immutable after construction and safe to share across threads.
#[derive(Debug, Default)]
pub struct Registry {
    /// Entity schemas by name (case-significant).
    entities: HashMap<String, EntitySchema>,
    /// Entity names in declaration order.
    order: Vec<String>,
}

impl Registry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(entities: HashMap<String, EntitySchema>, order: Vec<String>) -> Self {
        Self { entities, order }
    }

    /// Look up an entity schema by name.
    pub fn lookup_entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.get(name)
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// All entity schemas in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntitySchema> {
        self.order.iter().filter_map(|name| self.entities.get(name))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
