//! # Validators
//!
//! A closed set of value-acceptance rules, dispatched by matching the tag.
//! A validator is a pure predicate over a candidate value; it never mutates
//! anything and never looks outside the candidate.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelError, ModelResult};

/// Value categories recognized by [`Validator::TypeTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl ValueType {
    /// Returns the type name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// The category of a concrete value.
    pub fn of(value: &Value) -> ValueType {
        match value {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueType::Int
                } else {
                    ValueType::Float
                }
            }
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Whether a value belongs to this category.
    ///
    /// `Float` accepts integer values as well; an int is an acceptable float.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::Float => value.is_number(),
            _ => ValueType::of(value) == *self,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully-anchored string pattern with a lazily compiled, cached regex.
///
/// Construction never fails; an unanchored or malformed pattern surfaces as
/// a [`ModelError::Configuration`] at the first match attempt.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: OnceCell<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The pattern source string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the stringified candidate matches the whole pattern.
    pub fn matches(&self, candidate: &Value) -> ModelResult<bool> {
        let regex = self.compiled()?;
        Ok(regex.is_match(&stringify(candidate)))
    }

    fn compiled(&self) -> ModelResult<&Regex> {
        if let Some(regex) = self.compiled.get() {
            return Ok(regex);
        }
        if !(self.source.starts_with('^') && self.source.ends_with('$')) {
            return Err(ModelError::configuration(format!(
                "pattern '{}' must be anchored with ^ and $",
                self.source
            )));
        }
        let regex = Regex::new(&self.source).map_err(|e| {
            ModelError::configuration(format!("pattern '{}' failed to compile: {}", self.source, e))
        })?;
        Ok(self.compiled.get_or_init(|| regex))
    }
}

/// User-supplied acceptance predicate. Programmatic only; not expressible in
/// the JSON schema grammar.
pub type Predicate = Rc<dyn Fn(&Value) -> bool>;

/// A value-acceptance rule attached to a field.
#[derive(Clone, Default)]
pub enum Validator {
    /// Always accepts.
    #[default]
    None,
    /// Entire stringified value must match the anchored pattern.
    Pattern(Pattern),
    /// Value must equal one of the allowed literals.
    OneOf(Vec<Value>),
    /// Value must belong to the given category.
    TypeTag(ValueType),
    /// Arbitrary user logic.
    Predicate(Predicate),
}

impl Validator {
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(Pattern::new(source))
    }

    pub fn one_of(allowed: impl Into<Vec<Value>>) -> Self {
        Self::OneOf(allowed.into())
    }

    pub fn type_tag(tag: ValueType) -> Self {
        Self::TypeTag(tag)
    }

    pub fn predicate(f: impl Fn(&Value) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(f))
    }

    /// Whether the candidate is acceptable.
    ///
    /// # Errors
    ///
    /// `ModelError::Configuration` for a pattern that is unanchored or fails
    /// to compile, surfaced here rather than at construction.
    pub fn validate(&self, candidate: &Value) -> ModelResult<bool> {
        match self {
            Validator::None => Ok(true),
            Validator::Pattern(pattern) => pattern.matches(candidate),
            Validator::OneOf(allowed) => Ok(allowed.contains(candidate)),
            Validator::TypeTag(tag) => Ok(tag.matches(candidate)),
            Validator::Predicate(predicate) => Ok(predicate(candidate)),
        }
    }

    /// Short description used in generated rejection messages.
    pub fn describe(&self) -> String {
        match self {
            Validator::None => "no validator".to_string(),
            Validator::Pattern(pattern) => format!("pattern '{}'", pattern.source()),
            Validator::OneOf(allowed) => {
                let rendered: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                format!("one of [{}]", rendered.join(", "))
            }
            Validator::TypeTag(tag) => format!("type '{}'", tag.name()),
            Validator::Predicate(_) => "predicate".to_string(),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::None => f.write_str("None"),
            Validator::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.source).finish(),
            Validator::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
            Validator::TypeTag(tag) => f.debug_tuple("TypeTag").field(tag).finish(),
            Validator::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Stringification rule for pattern matching: strings verbatim, every other
/// value in its JSON rendering.
fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_none_accepts_everything() {
        let validator = Validator::None;
        assert!(validator.validate(&json!(null)).unwrap());
        assert!(validator.validate(&json!({"a": 1})).unwrap());
    }

    #[test]
    fn test_pattern_matches_whole_string() {
        let validator = Validator::pattern("^[a-z0-9_]+$");
        assert!(validator.validate(&json!("dbname")).unwrap());
        assert!(!validator.validate(&json!("bad name")).unwrap());
        // Partial matches are not matches.
        assert!(!validator.validate(&json!("ok until -")).unwrap());
    }

    #[test]
    fn test_pattern_stringifies_non_string_values() {
        let validator = Validator::pattern("^true$");
        assert!(validator.validate(&json!(true)).unwrap());
        assert!(!validator.validate(&json!(false)).unwrap());

        let digits = Validator::pattern("^[0-9]+$");
        assert!(digits.validate(&json!(8080)).unwrap());
    }

    #[test]
    fn test_unanchored_pattern_is_lazy_configuration_error() {
        let validator = Validator::pattern("[a-z]+");
        let err = validator.validate(&json!("abc")).unwrap_err();
        assert!(matches!(err, ModelError::Configuration { .. }));
        assert!(err.to_string().contains("anchored"));
    }

    #[test]
    fn test_malformed_pattern_is_lazy_configuration_error() {
        let validator = Validator::pattern("^[$");
        let err = validator.validate(&json!("x")).unwrap_err();
        assert!(matches!(err, ModelError::Configuration { .. }));
    }

    #[test]
    fn test_pattern_compiles_once() {
        let pattern = Pattern::new("^[a-z]+$");
        assert!(pattern.matches(&json!("abc")).unwrap());
        let first = pattern.compiled.get().unwrap() as *const Regex;
        assert!(!pattern.matches(&json!("123")).unwrap());
        let second = pattern.compiled.get().unwrap() as *const Regex;
        assert_eq!(first, second);
    }

    #[test]
    fn test_one_of_contains() {
        let validator = Validator::one_of(vec![json!("a"), json!(2), json!(true)]);
        assert!(validator.validate(&json!("a")).unwrap());
        assert!(validator.validate(&json!(2)).unwrap());
        assert!(!validator.validate(&json!("b")).unwrap());
    }

    #[test]
    fn test_type_tag_matching() {
        assert!(Validator::type_tag(ValueType::Bool).validate(&json!(false)).unwrap());
        assert!(!Validator::type_tag(ValueType::Bool).validate(&json!(3)).unwrap());
        assert!(Validator::type_tag(ValueType::Int).validate(&json!(3)).unwrap());
        assert!(!Validator::type_tag(ValueType::Int).validate(&json!(3.5)).unwrap());
        assert!(Validator::type_tag(ValueType::String).validate(&json!("s")).unwrap());
    }

    #[test]
    fn test_float_accepts_integers() {
        let validator = Validator::type_tag(ValueType::Float);
        assert!(validator.validate(&json!(99.5)).unwrap());
        assert!(validator.validate(&json!(100)).unwrap());
        assert!(!validator.validate(&json!("100")).unwrap());
    }

    #[test]
    fn test_predicate_dispatch() {
        let validator = Validator::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert!(validator.validate(&json!(4)).unwrap());
        assert!(!validator.validate(&json!(3)).unwrap());
    }

    #[test]
    fn test_describe_names_the_validator() {
        assert_eq!(Validator::type_tag(ValueType::Bool).describe(), "type 'bool'");
        assert_eq!(Validator::pattern("^x$").describe(), "pattern '^x$'");
        assert!(Validator::one_of(vec![json!(1), json!(2)]).describe().contains("1, 2"));
    }

    #[test]
    fn test_value_type_of() {
        assert_eq!(ValueType::of(&json!(null)), ValueType::Null);
        assert_eq!(ValueType::of(&json!(1)), ValueType::Int);
        assert_eq!(ValueType::of(&json!(1.5)), ValueType::Float);
        assert_eq!(ValueType::of(&json!([1])), ValueType::Array);
        assert_eq!(ValueType::of(&json!({})), ValueType::Object);
    }
}
