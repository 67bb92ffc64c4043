//! Facet thresholds common types, IDs, and errors.
//!
//! This crate provides foundational types shared across ft-core modules:
//! - Example and run identity types
//! - Dataset and model field specs
//! - Common error types
//! - Report schema versioning

pub mod error;
pub mod id;
pub mod schema;
pub mod spec;

pub use error::{Error, Result};
pub use id::{ExampleId, IndexedExample, JsonDict, RunId};
pub use schema::SCHEMA_VERSION;
pub use spec::{BinaryHead, DatasetSpec, FieldSpec, OutputField, OutputSpec};
