//! Field and node validation against the schema.

use bastion_core::{Data, FieldError, FieldErrors, Input, Operation, Value};
use bastion_registry::{EntitySchema, FieldKind, FieldSchema};
use regex_lite::Regex;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const URL_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/?#]+[^\s]*$";
const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Validate one scalar field value.
///
/// `value` is `None` when the field is absent from the input. Required
/// checks apply to `create` only; on `update` absence is allowed but an
/// invalid value is not.
pub fn validate_field(
    field: &FieldSchema,
    value: Option<&Value>,
    operation: Operation,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut report = |message: String| errors.push(FieldError::new(&field.name, message));

    let FieldKind::Scalar(kind) = &field.kind else {
        if value.is_some() {
            report("expected a nested relationship input, got a scalar".to_string());
        }
        return errors;
    };

    let value = match value {
        None => {
            if operation == Operation::Create && field.required && field.default.is_none() {
                report("is required".to_string());
            }
            return errors;
        }
        Some(Value::Null) => {
            if !field.nullable {
                report("cannot be null".to_string());
            }
            return errors;
        }
        Some(value) => value,
    };

    if !kind.accepts(value) {
        report(format!(
            "expected {}, got {}",
            kind.name(),
            value.type_name()
        ));
        return errors;
    }

    if let Some(min) = &field.min {
        if value.compare(min).is_some_and(|o| o.is_lt()) {
            report(format!("must be at least {}", min));
        }
    }
    if let Some(max) = &field.max {
        if value.compare(max).is_some_and(|o| o.is_gt()) {
            report(format!("must be at most {}", max));
        }
    }

    if let Some(allowed) = &field.allowed_values {
        if !allowed.iter().any(|v| v.loosely_equals(value)) {
            report(format!("{} is not an allowed value", value));
        }
    }

    if let Some(s) = value.as_str() {
        let len = s.chars().count();
        if field.length_min.is_some_and(|min| len < min) {
            report(format!(
                "must be at least {} characters",
                field.length_min.unwrap_or_default()
            ));
        }
        if field.length_max.is_some_and(|max| len > max) {
            report(format!(
                "must be at most {} characters",
                field.length_max.unwrap_or_default()
            ));
        }

        if let Some(pattern) = &field.match_pattern {
            match Regex::new(pattern) {
                Ok(re) if re.is_match(s) => {}
                Ok(_) => report(format!("must match pattern {}", pattern)),
                Err(e) => report(format!("has an invalid match pattern: {}", e)),
            }
        }

        if let Some(format) = &field.format {
            if let Some(message) = check_format(format, s) {
                report(message);
            }
        }
    }

    errors
}

/// Check a named format. Returns an error message when the value fails.
fn check_format(format: &str, s: &str) -> Option<String> {
    let pattern = match format {
        "email" => EMAIL_PATTERN,
        "url" => URL_PATTERN,
        "uuid" => UUID_PATTERN,
        "slug" => SLUG_PATTERN,
        other => return Some(format!("has unknown format {}", other)),
    };
    match Regex::new(pattern) {
        Ok(re) if re.is_match(s) => None,
        Ok(_) => Some(format!("must be a valid {}", format)),
        Err(e) => Some(format!("format {} failed to compile: {}", format, e)),
    }
}

/// Validate every field of one payload node.
///
/// Unknown fields are reported. Relationship inputs on scalar fields are
/// passed through untouched; their structure is not validated here.
pub fn validate_node(schema: &EntitySchema, data: &Data, operation: Operation) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for name in data.keys() {
        if !schema.has_field(name) {
            errors.add(name.as_str(), format!("unknown field on {}", schema.name));
        }
    }

    for field in schema.fields() {
        let value = match data.get(&field.name) {
            Some(Input::Value(v)) => Some(v),
            Some(Input::Relation(_)) => continue,
            None => None,
        };
        for error in validate_field(field, value, operation) {
            errors.push(error);
        }
    }

    errors
}

/// Fill missing fields that declare a default.
pub fn apply_defaults(schema: &EntitySchema, data: &mut Data) {
    for field in schema.fields() {
        if let Some(default) = &field.default {
            data.entry(field.name.clone())
                .or_insert_with(|| Input::Value(default.clone()));
        }
    }
}
