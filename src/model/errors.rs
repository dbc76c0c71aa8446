//! # Model Errors
//!
//! Error taxonomy for the attribute tree. All failures are synchronous and
//! surfaced directly to the caller; nothing is retried, swallowed, or logged
//! internally.

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model errors
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Unsupported schema-value shape, duplicate sibling name, or an
    /// attempt to nest a group inside itself.
    #[error("schema entry '{key}': {reason}")]
    Schema { key: String, reason: String },

    /// Value rejected by a field's validator at assignment time. The
    /// message is the field's custom override when one is configured,
    /// otherwise a generated message naming the validator.
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Lookup of a nonexistent child by name.
    #[error("attribute not found: {name}")]
    NotFound { name: String },

    /// A validator that cannot be evaluated, discovered lazily at first use.
    #[error("validator misconfigured: {reason}")]
    Configuration { reason: String },
}

impl ModelError {
    /// Create a schema error for the given key
    pub fn schema(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error for the given field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// The rejection message of a validation failure, without the field
    /// prefix. `None` for every other error kind.
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. } => Some(message),
            _ => None,
        }
    }
}
