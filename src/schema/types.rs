//! Schema type definitions: the typed form of the declarative grammar,
//! either parsed from a JSON literal or assembled through the builder API.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Pattern, Validator, ValueType};

/// Declarative description of one leaf field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Value the field starts with, stored unchecked.
    pub initial: Value,
    /// Acceptance rule for later checked assignments.
    pub validator: Validator,
    /// Rejection-message override.
    pub error_message: Option<String>,
}

impl FieldSpec {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self {
            initial: initial.into(),
            validator: Validator::None,
            error_message: None,
        }
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// One schema entry: a leaf description or a nested group schema.
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    Field(FieldSpec),
    Group(Schema),
}

/// Ordered mapping from child name to entry.
///
/// Mapping semantics: inserting a name twice through the builder replaces
/// the earlier entry, the way a literal with a repeated key would.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: IndexMap<String, SchemaEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form: adds a leaf entry.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, SchemaEntry::Field(spec));
        self
    }

    /// Builder form: adds a nested group entry.
    pub fn group(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.insert(name, SchemaEntry::Group(schema));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: SchemaEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &SchemaEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// JSON validator descriptor, shape-probed the way the original grammar is:
/// a string is a pattern, an array is an allowed set, `{"type": …}` is a
/// type tag. Predicates have no serialized form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValidatorSpec {
    Pattern(String),
    OneOf(Vec<Value>),
    TypeTag {
        #[serde(rename = "type")]
        value_type: ValueType,
    },
}

impl ValidatorSpec {
    pub fn into_validator(self) -> Validator {
        match self {
            ValidatorSpec::Pattern(source) => Validator::Pattern(Pattern::new(source)),
            ValidatorSpec::OneOf(allowed) => Validator::OneOf(allowed),
            ValidatorSpec::TypeTag { value_type } => Validator::TypeTag(value_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let schema = Schema::new()
            .field("zeta", FieldSpec::new(json!(1)))
            .field("alpha", FieldSpec::new(json!(2)))
            .group("nested", Schema::new());

        let names: Vec<&String> = schema.entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "nested"]);
    }

    #[test]
    fn test_builder_replaces_repeated_key() {
        let schema = Schema::new()
            .field("x", FieldSpec::new(json!(1)))
            .field("x", FieldSpec::new(json!(2)));

        assert_eq!(schema.len(), 1);
        match schema.get("x").unwrap() {
            SchemaEntry::Field(spec) => assert_eq!(spec.initial, json!(2)),
            SchemaEntry::Group(_) => panic!("expected a field entry"),
        }
    }

    #[test]
    fn test_validator_spec_shapes() {
        let spec: ValidatorSpec = serde_json::from_value(json!("^[a-z]+$")).unwrap();
        assert!(matches!(spec, ValidatorSpec::Pattern(_)));

        let spec: ValidatorSpec = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert!(matches!(spec, ValidatorSpec::OneOf(_)));

        let spec: ValidatorSpec = serde_json::from_value(json!({"type": "bool"})).unwrap();
        assert!(matches!(
            spec,
            ValidatorSpec::TypeTag {
                value_type: ValueType::Bool
            }
        ));

        assert!(serde_json::from_value::<ValidatorSpec>(json!(42)).is_err());
    }
}
