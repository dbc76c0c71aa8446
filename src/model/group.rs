//! # FieldGroup
//!
//! A named composite node: an insertion-ordered mapping from unique child
//! name to field-or-group. A group is a subject of its own changes and an
//! observer of every child; a child's change marks the group modified and is
//! re-raised unchanged to the group's own observers, so one write at any
//! depth reaches every ancestor up to the root.
//!
//! Ownership is strictly one-directional: the group owns its children, and
//! the child-to-parent observer registration is a weak back-reference used
//! only to route bubbling.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::observer::{Observer, Subject};
use crate::schema::{Schema, SchemaEntry};

use super::attribute::{Attribute, ChangeEvent};
use super::errors::{ModelError, ModelResult};
use super::field::Field;

/// Composite node: ordered, uniquely-named container of fields and groups.
pub struct FieldGroup {
    name: Option<String>,
    children: RefCell<IndexMap<String, Attribute>>,
    modified: Cell<bool>,
    changes: Subject<ChangeEvent>,
    self_ref: Weak<FieldGroup>,
}

impl FieldGroup {
    /// Creates an empty, unnamed group (a tree root).
    pub fn new() -> Rc<Self> {
        Self::build(None)
    }

    /// Creates an empty, named group.
    pub fn named(name: impl Into<String>) -> Rc<Self> {
        Self::build(Some(name.into()))
    }

    fn build(name: Option<String>) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            name,
            children: RefCell::new(IndexMap::new()),
            modified: Cell::new(false),
            changes: Subject::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// The group's name. Informational only; never used for lookup.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The cached modified flag. Never recomputed from children on read: a
    /// non-recursive [`clear_modified`](Self::clear_modified) on this group
    /// can leave a still-modified child under a clean parent.
    pub fn is_modified(&self) -> bool {
        self.modified.get()
    }

    /// Resets the local flag; with `recurse`, resets the whole subtree.
    pub fn clear_modified(&self, recurse: bool) {
        self.modified.set(false);
        if recurse {
            for child in self.children.borrow().values() {
                child.clear_modified(true);
            }
        }
    }

    /// The group's change channel.
    pub fn changes(&self) -> &Subject<ChangeEvent> {
        &self.changes
    }

    /// Returns the named child, failing when absent.
    pub fn attribute(&self, name: &str) -> ModelResult<Attribute> {
        self.get(name).ok_or_else(|| ModelError::not_found(name))
    }

    /// Returns the named child, or `None` for the caller to substitute a
    /// default.
    pub fn get(&self, name: &str) -> Option<Attribute> {
        self.children.borrow().get(name).cloned()
    }

    /// Attaches a child under its own name.
    ///
    /// Rejects a sibling-name collision and any attachment that would make a
    /// group contain itself, directly or transitively. On success the group
    /// registers itself as the child's observer and notifies its own
    /// observers with itself as origin.
    pub fn add_attribute(&self, child: Attribute) -> ModelResult<()> {
        let name = child
            .name()
            .ok_or_else(|| {
                ModelError::schema("<unnamed>", "an unnamed group cannot be attached to a parent")
            })?
            .to_string();
        if self.children.borrow().contains_key(&name) {
            return Err(ModelError::schema(&name, "duplicate sibling name"));
        }
        self.check_containment(&child, &name)?;

        self.attach(&child);
        self.children.borrow_mut().insert(name.clone(), child);
        tracing::debug!(child = %name, "attribute added");
        self.notify_self();
        Ok(())
    }

    /// Detaches the named child.
    ///
    /// A removed child group is recursively torn down first: every
    /// descendant's parent registration is dropped and every descendant
    /// group emptied, so no mutation inside the detached subtree can ever
    /// reach this group again. Notifies the group's own observers with
    /// itself as origin.
    pub fn remove_attribute(&self, name: &str) -> ModelResult<()> {
        let child = self
            .children
            .borrow_mut()
            .shift_remove(name)
            .ok_or_else(|| ModelError::not_found(name))?;

        if let Some(group) = child.as_group() {
            group.detach_descendants();
        }
        self.detach(&child);
        tracing::debug!(child = %name, "attribute removed");
        self.notify_self();
        Ok(())
    }

    /// Replaces this group's children with the tree the schema describes.
    ///
    /// Atomic by construction: the whole subtree is built from the schema
    /// before the live children are touched, then swapped in. One
    /// notification fires after the swap, with this group as origin. For the
    /// fallible path from a raw JSON literal, see
    /// [`load_value`](Self::load_value).
    pub fn load(&self, schema: &Schema) {
        let built = build_children(schema);

        self.detach_descendants();
        {
            let mut children = self.children.borrow_mut();
            for (name, child) in built {
                self.attach(&child);
                children.insert(name, child);
            }
        }
        tracing::debug!(children = self.len(), "schema loaded");
        self.notify_self();
    }

    /// Parses the JSON schema grammar and loads it.
    ///
    /// Either the whole literal parses and replaces the children, or the
    /// error is returned with prior state fully preserved.
    pub fn load_value(&self, value: &Value) -> ModelResult<()> {
        let schema = Schema::parse(value)?;
        self.load(&schema);
        Ok(())
    }

    /// Value-only inverse of [`load`](Self::load): a nested object of
    /// current values in child order, validators and messages discarded.
    pub fn dump(&self) -> Value {
        let mut object = Map::new();
        for (name, child) in self.children.borrow().iter() {
            object.insert(name.clone(), child.dump());
        }
        Value::Object(object)
    }

    /// Child names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.children.borrow().keys().cloned().collect()
    }

    /// Children in insertion order.
    pub fn values(&self) -> Vec<Attribute> {
        self.children.borrow().values().cloned().collect()
    }

    /// Name/child pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, Attribute)> {
        self.children
            .borrow()
            .iter()
            .map(|(name, child)| (name.clone(), child.clone()))
            .collect()
    }

    /// Membership test by child name.
    pub fn contains(&self, name: &str) -> bool {
        self.children.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Removes every child, in order, with full detach semantics; equivalent
    /// to calling [`remove_attribute`](Self::remove_attribute) per child.
    pub fn clear(&self) {
        for name in self.keys() {
            // A reentrant observer may have raced a removal; absence is fine.
            let _ = self.remove_attribute(&name);
        }
    }

    /// Rejects attaching a group into itself, directly or transitively.
    fn check_containment(&self, child: &Attribute, key: &str) -> ModelResult<()> {
        let Some(group) = child.as_group() else {
            return Ok(());
        };
        let Some(me) = self.self_ref.upgrade() else {
            return Ok(());
        };
        if Rc::ptr_eq(group, &me) || group.subtree_contains(&me) {
            return Err(ModelError::schema(key, "a group cannot contain itself"));
        }
        Ok(())
    }

    fn subtree_contains(&self, target: &Rc<FieldGroup>) -> bool {
        self.children.borrow().values().any(|child| match child {
            Attribute::Group(group) => Rc::ptr_eq(group, target) || group.subtree_contains(target),
            Attribute::Field(_) => false,
        })
    }

    /// Registers this group as the child's observer.
    fn attach(&self, child: &Attribute) {
        let weak: Weak<dyn Observer<ChangeEvent>> = self.self_ref.clone();
        child.changes().register_weak(weak);
    }

    /// Drops this group's observer registration on the child.
    fn detach(&self, child: &Attribute) {
        let weak: Weak<dyn Observer<ChangeEvent>> = self.self_ref.clone();
        child.changes().remove_weak(&weak);
    }

    /// Empties this group and drops every parent registration in the
    /// subtree, without firing notifications from the dying nodes.
    fn detach_descendants(&self) {
        let mut children = self.children.borrow_mut();
        for (_, child) in children.drain(..) {
            if let Some(group) = child.as_group() {
                group.detach_descendants();
            }
            self.detach(&child);
        }
    }

    fn notify_self(&self) {
        if let Some(origin) = self.self_ref.upgrade() {
            self.changes.notify(&ChangeEvent::new(Attribute::Group(origin)));
        }
    }
}

impl Observer<ChangeEvent> for FieldGroup {
    /// Bubbling: a child's change marks this group modified and re-raises
    /// the original event unchanged, so observers at any height see the
    /// leaf-level origin.
    fn on_event(&self, event: &ChangeEvent) {
        self.modified.set(true);
        self.changes.notify(event);
    }
}

impl fmt::Debug for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldGroup")
            .field("name", &self.name)
            .field("children", &self.children.borrow().len())
            .field("modified", &self.modified.get())
            .finish()
    }
}

/// Builds the child list a schema describes, with no live tree involved.
fn build_children(schema: &Schema) -> Vec<(String, Attribute)> {
    let mut built = Vec::with_capacity(schema.len());
    for (name, entry) in schema.entries() {
        let child = match entry {
            SchemaEntry::Field(spec) => Attribute::Field(Field::with_validator(
                name.clone(),
                spec.initial.clone(),
                spec.validator.clone(),
                spec.error_message.clone(),
            )),
            SchemaEntry::Group(nested) => {
                let group = FieldGroup::named(name.clone());
                let grandchildren = build_children(nested);
                {
                    let mut children = group.children.borrow_mut();
                    for (child_name, grandchild) in grandchildren {
                        group.attach(&grandchild);
                        children.insert(child_name, grandchild);
                    }
                }
                Attribute::Group(group)
            }
        };
        built.push((name.clone(), child));
    }
    built
}
