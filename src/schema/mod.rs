//! # Schema Grammar
//!
//! The declarative input format that builds an attribute tree.
//!
//! A schema maps each child name to either a leaf description — an ordered
//! sequence of one to three elements `[initial, validator?, message?]` — or
//! a nested mapping parsed as a child group. Key order is semantic: it fixes
//! the child order of the resulting group, which downstream consumers render
//! sequentially.

mod loader;
mod types;

pub use types::{FieldSpec, Schema, SchemaEntry, ValidatorSpec};
