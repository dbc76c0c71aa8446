//! fieldtree - a reactive, schema-validated attribute tree
//!
//! Leaf fields and named groups of fields form a composite model driven by a
//! declarative schema. Every successful write marks the written node and all
//! of its ancestors modified, and every change is fanned out synchronously
//! through one generic observer fabric.

pub mod model;
pub mod observer;
pub mod repository;
pub mod schema;
