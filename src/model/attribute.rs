//! # Attributes and Change Events
//!
//! [`Attribute`] is the child union a group stores: a leaf [`Field`] or a
//! nested [`FieldGroup`], both behind shared handles the tree owns.
//! [`ChangeEvent`] is the payload carried through the observer fabric: the
//! originating node itself, unchanged all the way up the ancestor chain.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::observer::Subject;

use super::field::Field;
use super::group::FieldGroup;

/// A child node: leaf field or nested group.
#[derive(Clone)]
pub enum Attribute {
    Field(Rc<Field>),
    Group(Rc<FieldGroup>),
}

impl Attribute {
    /// The node's name. Fields are always named; a root group may not be.
    pub fn name(&self) -> Option<&str> {
        match self {
            Attribute::Field(field) => Some(field.name()),
            Attribute::Group(group) => group.name(),
        }
    }

    /// Whether the node carries the modified flag.
    pub fn is_modified(&self) -> bool {
        match self {
            Attribute::Field(field) => field.is_modified(),
            Attribute::Group(group) => group.is_modified(),
        }
    }

    /// Resets the modified flag; `recurse` descends into group subtrees and
    /// is meaningless for a leaf.
    pub fn clear_modified(&self, recurse: bool) {
        match self {
            Attribute::Field(field) => field.clear_modified(),
            Attribute::Group(group) => group.clear_modified(recurse),
        }
    }

    /// The node's change channel.
    pub fn changes(&self) -> &Subject<ChangeEvent> {
        match self {
            Attribute::Field(field) => field.changes(),
            Attribute::Group(group) => group.changes(),
        }
    }

    pub fn as_field(&self) -> Option<&Rc<Field>> {
        match self {
            Attribute::Field(field) => Some(field),
            Attribute::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Rc<FieldGroup>> {
        match self {
            Attribute::Field(_) => None,
            Attribute::Group(group) => Some(group),
        }
    }

    /// Node kind for error and log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Attribute::Field(_) => "field",
            Attribute::Group(_) => "group",
        }
    }

    /// Value-only view: a field's value, or a group's `dump()`.
    pub fn dump(&self) -> Value {
        match self {
            Attribute::Field(field) => field.value(),
            Attribute::Group(group) => group.dump(),
        }
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Field(field) => write!(f, "Field({})", field.name()),
            Attribute::Group(group) => write!(f, "Group({})", group.name().unwrap_or("<unnamed>")),
        }
    }
}

/// A change notification carrying the originating node.
///
/// Bubbling re-raises the same event at every ancestor, so an observer on
/// the root sees the leaf-level origin, not a wrapper.
#[derive(Clone)]
pub struct ChangeEvent {
    origin: Attribute,
}

impl ChangeEvent {
    pub(crate) fn new(origin: Attribute) -> Self {
        Self { origin }
    }

    /// The node whose mutation produced this event.
    pub fn origin(&self) -> &Attribute {
        &self.origin
    }
}

impl fmt::Debug for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChangeEvent").field(&self.origin).finish()
    }
}
