//! RegistryBuilder for constructing an immutable Registry.

use crate::{AccessPolicy, EntitySchema, FieldSchema, HookSet, Registry};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate entity name: {0}")]
    DuplicateEntityName(String),

    #[error("Duplicate field {field} on entity {entity}")]
    DuplicateField { entity: String, field: String },

    #[error("Malformed relationship reference '{reference}' on {entity}.{field}")]
    MalformedReference {
        entity: String,
        field: String,
        reference: String,
    },

    #[error("Unknown relationship target {target} on {entity}.{field}")]
    UnknownTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("Relationship {entity}.{field} references {target}.{target_field}, which is not a relationship back to {entity}")]
    InvalidBackReference {
        entity: String,
        field: String,
        target: String,
        target_field: String,
    },
}

impl RegistryError {
    fn malformed(entity: &str, field: &str, reference: &str) -> Self {
        Self::MalformedReference {
            entity: entity.to_string(),
            field: field.to_string(),
            reference: reference.to_string(),
        }
    }
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Entities being built, in declaration order.
    entities: Vec<EntitySchema>,
    /// Names already taken.
    names: HashSet<String>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity definition.
    pub fn add_entity(&mut self, name: impl Into<String>) -> EntityBuilder<'_> {
        EntityBuilder {
            builder: self,
            name: name.into(),
            fields: Vec::new(),
            access: AccessPolicy::default(),
            hooks: HookSet::default(),
        }
    }

    /// Build the immutable Registry, resolving every relationship reference.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let by_name: HashMap<&str, &EntitySchema> = self
            .entities
            .iter()
            .map(|e| (e.name.as_str(), e))
            .collect();

        for entity in &self.entities {
            for (field, rel) in entity.relationships() {
                let malformed = rel.target.is_empty()
                    || rel
                        .target_field
                        .as_deref()
                        .is_some_and(|f| f.is_empty() || f.contains('.'));
                if malformed {
                    return Err(RegistryError::malformed(
                        &entity.name,
                        &field.name,
                        &rel.reference,
                    ));
                }

                let target = by_name.get(rel.target.as_str()).ok_or_else(|| {
                    RegistryError::UnknownTarget {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target: rel.target.clone(),
                    }
                })?;

                if let Some(target_field) = &rel.target_field {
                    let points_back = target
                        .field(target_field)
                        .and_then(FieldSchema::as_relationship)
                        .is_some_and(|back| back.target == entity.name);
                    if !points_back {
                        return Err(RegistryError::InvalidBackReference {
                            entity: entity.name.clone(),
                            field: field.name.clone(),
                            target: rel.target.clone(),
                            target_field: target_field.clone(),
                        });
                    }
                }
            }
        }

        let order = self.entities.iter().map(|e| e.name.clone()).collect();
        let entities = self
            .entities
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect();
        Ok(Registry::new(entities, order))
    }
}

/// Builder for an entity definition.
pub struct EntityBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    name: String,
    fields: Vec<FieldSchema>,
    access: AccessPolicy,
    hooks: HookSet,
}

impl<'a> EntityBuilder<'a> {
    /// Add a field. Declaration order is the order field hooks run in.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }

    /// Finish building this entity.
    pub fn done(self) -> Result<(), RegistryError> {
        if self.builder.names.contains(&self.name) {
            return Err(RegistryError::DuplicateEntityName(self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistryError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        self.builder.names.insert(self.name.clone());
        self.builder.entities.push(EntitySchema::new(
            self.name,
            self.fields,
            self.access,
            self.hooks,
        ));
        Ok(())
    }
}
