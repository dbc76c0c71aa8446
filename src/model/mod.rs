//! # Attribute Model
//!
//! The composite tree every form and piece of domain configuration is built
//! from: [`Field`] leaves holding one validated value each, and [`FieldGroup`]
//! composites holding an insertion-ordered, uniquely-named set of children.
//!
//! ## Design Principles
//!
//! - Checked assignment is atomic: a rejected value changes nothing.
//! - Every successful write marks the node and all of its ancestors modified.
//! - Change notifications bubble unchanged from the originating node to the
//!   root, through the observer fabric.
//! - Parents own children; the child-to-parent link exists only to route
//!   notifications and never manages lifetime.

mod attribute;
mod errors;
mod field;
mod group;
mod validator;

pub use attribute::{Attribute, ChangeEvent};
pub use errors::{ModelError, ModelResult};
pub use field::Field;
pub use group::FieldGroup;
pub use validator::{Pattern, Predicate, Validator, ValueType};
