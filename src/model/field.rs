//! # Field
//!
//! A named leaf node: one value, one validator, one modified flag, one
//! change channel. Validation happens before assignment; a rejected value
//! leaves the field exactly as it was.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::observer::Subject;

use super::attribute::{Attribute, ChangeEvent};
use super::errors::{ModelError, ModelResult};
use super::validator::Validator;

/// Leaf node holding one validated value.
pub struct Field {
    name: String,
    value: RefCell<Value>,
    validator: Validator,
    error_message: Option<String>,
    modified: Cell<bool>,
    changes: Subject<ChangeEvent>,
    self_ref: Weak<Field>,
}

impl Field {
    /// Creates an unvalidated field.
    pub fn new(name: impl Into<String>, initial: Value) -> Rc<Self> {
        Self::with_validator(name, initial, Validator::None, None)
    }

    /// Creates a field with a validator and an optional rejection-message
    /// override. The initial value is stored unchecked.
    pub fn with_validator(
        name: impl Into<String>,
        initial: Value,
        validator: Validator,
        error_message: Option<String>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            name: name.into(),
            value: RefCell::new(initial),
            validator,
            error_message,
            modified: Cell::new(false),
            changes: Subject::new(),
            self_ref: self_ref.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value.
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    /// Resets this field's flag. Leaves have nothing to recurse into.
    pub fn clear_modified(&self) {
        self.modified.set(false);
    }

    /// The field's change channel.
    pub fn changes(&self) -> &Subject<ChangeEvent> {
        &self.changes
    }

    /// Whether the candidate would be accepted by this field's validator.
    pub fn validate(&self, candidate: &Value) -> ModelResult<bool> {
        self.validator.validate(candidate)
    }

    /// Checked assignment.
    ///
    /// On rejection, fails with `ModelError::Validation` carrying the
    /// configured message override or a generated message naming the
    /// validator; value and modified flag are untouched. On success the
    /// value is stored, the field is marked modified, and every observer is
    /// notified synchronously with this field as the event origin.
    pub fn set_value(&self, candidate: Value) -> ModelResult<()> {
        if !self.validate(&candidate)? {
            let message = match &self.error_message {
                Some(message) => message.clone(),
                None => format!(
                    "value {} rejected by {}",
                    candidate,
                    self.validator.describe()
                ),
            };
            return Err(ModelError::validation(&self.name, message));
        }
        self.store(candidate);
        Ok(())
    }

    /// Assignment with validation bypassed, for callers that have already
    /// validated the candidate externally. Marks and notifies like
    /// [`set_value`](Self::set_value).
    pub fn set_value_unchecked(&self, candidate: Value) {
        self.store(candidate);
    }

    fn store(&self, candidate: Value) {
        *self.value.borrow_mut() = candidate;
        self.modified.set(true);
        tracing::trace!(field = %self.name, "value assigned");
        if let Some(origin) = self.self_ref.upgrade() {
            self.changes.notify(&ChangeEvent::new(Attribute::Field(origin)));
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value", &*self.value.borrow())
            .field("validator", &self.validator)
            .field("modified", &self.modified.get())
            .finish()
    }
}
