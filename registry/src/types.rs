//! Schema definition types.

use crate::{AccessPolicy, FieldAccess, FieldHooks, HookSet};
use bastion_core::Value;
use std::collections::HashMap;

/// Scalar field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Timestamp,
    List,
}

impl ScalarKind {
    /// Name matching `Value::type_name` for values of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Bool => "Bool",
            ScalarKind::Timestamp => "Timestamp",
            ScalarKind::List => "List",
        }
    }

    /// Check whether a value may be stored in a field of this kind.
    ///
    /// Null is accepted here; nullability is checked separately.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (ScalarKind::String, Value::String(_))
                | (ScalarKind::Int, Value::Int(_))
                | (ScalarKind::Float, Value::Float(_) | Value::Int(_))
                | (ScalarKind::Bool, Value::Bool(_))
                | (ScalarKind::Timestamp, Value::Timestamp(_) | Value::Int(_))
                | (ScalarKind::List, Value::List(_))
        )
    }
}

/// How many related records a relationship field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// A relationship to another entity, declared as `Entity` or `Entity.field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// The reference as declared.
    pub reference: String,
    /// Target entity name.
    pub target: String,
    /// Reciprocal field on the target, for two-sided relationships.
    pub target_field: Option<String>,
    pub cardinality: Cardinality,
}

impl Relationship {
    pub fn new(reference: impl Into<String>, cardinality: Cardinality) -> Self {
        let reference = reference.into();
        let (target, target_field) = match reference.split_once('.') {
            Some((entity, field)) => (entity.to_string(), Some(field.to_string())),
            None => (reference.clone(), None),
        };
        Self {
            reference,
            target,
            target_field,
            cardinality,
        }
    }

    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }
}

/// The kind of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Relationship(Relationship),
}

/// Field definition within an entity.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    /// Must be present on create.
    pub required: bool,
    /// May hold null.
    pub nullable: bool,
    /// Filled in on create when the input omits the field.
    pub default: Option<Value>,
    /// Minimum numeric value.
    pub min: Option<Value>,
    /// Maximum numeric value.
    pub max: Option<Value>,
    /// Named format ("email", "url", "uuid", "slug").
    pub format: Option<String>,
    /// Regex the string value must match.
    pub match_pattern: Option<String>,
    pub allowed_values: Option<Vec<Value>>,
    pub length_min: Option<usize>,
    pub length_max: Option<usize>,
    pub access: FieldAccess,
    pub hooks: FieldHooks,
}

impl FieldSchema {
    /// A scalar field.
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::with_kind(name, FieldKind::Scalar(kind))
    }

    /// A relationship field referencing `Entity` or `Entity.field`.
    pub fn relationship(
        name: impl Into<String>,
        reference: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self::with_kind(
            name,
            FieldKind::Relationship(Relationship::new(reference, cardinality)),
        )
    }

    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            nullable: true,
            default: None,
            min: None,
            max: None,
            format: None,
            match_pattern: None,
            allowed_values: None,
            length_min: None,
            length_max: None,
            access: FieldAccess::default(),
            hooks: FieldHooks::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_range(mut self, min: Option<Value>, max: Option<Value>) -> Self {
        // A `None` bound keeps the one already set.
        if min.is_some() {
            self.min = min;
        }
        if max.is_some() {
            self.max = max;
        }
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.match_pattern = Some(pattern.into());
        self
    }

    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.length_min = min;
        self.length_max = max;
        self
    }

    pub fn with_access(mut self, access: FieldAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_hooks(mut self, hooks: FieldHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match &self.kind {
            FieldKind::Relationship(rel) => Some(rel),
            FieldKind::Scalar(_) => None,
        }
    }
}

/// Entity definition: fields in declaration order, access policy and hooks.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    pub name: String,
    fields: Vec<FieldSchema>,
    field_index: HashMap<String, usize>,
    pub access: AccessPolicy,
    pub hooks: HookSet,
}

impl EntitySchema {
    pub(crate) fn new(
        name: String,
        fields: Vec<FieldSchema>,
        access: AccessPolicy,
        hooks: HookSet,
    ) -> Self {
        let field_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            name,
            fields,
            field_index,
            access,
            hooks,
        }
    }

    /// Get a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.field_index.get(name).map(|&i| &self.fields[i])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_index.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Relationship fields in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = (&FieldSchema, &Relationship)> {
        self.fields
            .iter()
            .filter_map(|f| f.as_relationship().map(|rel| (f, rel)))
    }
}
