//! Schema loading: parses the declarative JSON grammar into [`Schema`]
//! values, from in-memory literals, strings, or files on disk.
//!
//! Parsing is all-or-nothing. A malformed entry fails the whole parse with
//! an error naming the offending key, and no tree is touched; the live swap
//! happens later, in `FieldGroup::load`.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::model::{ModelError, ModelResult, ValueType};

use super::types::{FieldSpec, Schema, SchemaEntry, ValidatorSpec};

impl Schema {
    /// Parses a schema literal.
    ///
    /// The literal must be an object; each entry is either an array of one
    /// to three elements `[initial, validator?, message?]` or a nested
    /// object. Any other value shape fails with a schema error naming the
    /// key.
    pub fn parse(value: &Value) -> ModelResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            ModelError::schema(
                "<root>",
                format!("expected an object, got {}", ValueType::of(value).name()),
            )
        })?;
        Self::parse_object(object)
    }

    /// Parses a schema from JSON text.
    pub fn from_json_str(input: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ModelError::schema("<input>", format!("invalid JSON: {}", e)))?;
        Self::parse(&value)
    }

    /// Reads and parses a schema file, naming the path on failure.
    pub fn from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::schema(
                path.display().to_string(),
                format!("failed to read file: {}", e),
            )
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            ModelError::schema(path.display().to_string(), format!("invalid JSON: {}", e))
        })?;
        Self::parse(&value)
    }

    fn parse_object(object: &serde_json::Map<String, Value>) -> ModelResult<Self> {
        let mut schema = Schema::new();
        for (name, entry) in object {
            let parsed = match entry {
                Value::Array(elements) => SchemaEntry::Field(parse_field_spec(name, elements)?),
                Value::Object(nested) => SchemaEntry::Group(Self::parse_object(nested)?),
                other => {
                    return Err(ModelError::schema(
                        name,
                        format!(
                            "unsupported schema value of type {}",
                            ValueType::of(other).name()
                        ),
                    ))
                }
            };
            schema.insert(name.clone(), parsed);
        }
        Ok(schema)
    }
}

/// Interprets the 1-3 element leaf sequence `[initial, validator?, message?]`.
fn parse_field_spec(name: &str, elements: &[Value]) -> ModelResult<FieldSpec> {
    if elements.is_empty() || elements.len() > 3 {
        return Err(ModelError::schema(
            name,
            format!("expected 1 to 3 elements, got {}", elements.len()),
        ));
    }

    let mut spec = FieldSpec::new(elements[0].clone());

    if let Some(descriptor) = elements.get(1) {
        let parsed: Option<ValidatorSpec> =
            serde_json::from_value(descriptor.clone()).map_err(|_| {
                ModelError::schema(
                    name,
                    format!("unrecognized validator descriptor {}", descriptor),
                )
            })?;
        if let Some(validator) = parsed {
            spec.validator = validator.into_validator();
        }
    }

    if let Some(message) = elements.get(2) {
        let message = message.as_str().ok_or_else(|| {
            ModelError::schema(
                name,
                format!(
                    "error message must be a string, got {}",
                    ValueType::of(message).name()
                ),
            )
        })?;
        spec.error_message = Some(message.to_string());
    }

    Ok(spec)
}
