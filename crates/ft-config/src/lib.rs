//! Facet thresholds configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the thresholder options (cost ratio, facets, grid)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod thresholder;
pub mod validate;

pub use resolve::{load_config_file, resolve_config, ConfigError, ConfigPaths, ConfigSource};
pub use thresholder::{CandidateGrid, FacetSpec, ThresholderConfig, DEFAULT_COST_RATIO};
pub use validate::{validate, ValidationError, ValidationResult};
