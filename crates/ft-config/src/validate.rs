//! Semantic validation of thresholder configuration.
//!
//! Only checks that need nothing but the config itself live here. Facet
//! membership is checked against the examples of a run in ft-core.

use crate::thresholder::{CandidateGrid, ThresholderConfig};
use thiserror::Error;

/// A single semantic problem with a configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("cost_ratio must be a positive finite number, got {0}")]
    CostRatio(f64),

    #[error("uniform candidate grid needs at least one step")]
    EmptyGrid,

    #[error("facet '{0}' lists members under both data and ids")]
    AmbiguousFacet(String),
}

pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a configuration, collecting every problem found.
pub fn validate(config: &ThresholderConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if !(config.cost_ratio.is_finite() && config.cost_ratio > 0.0) {
        errors.push(ValidationError::CostRatio(config.cost_ratio));
    }

    if let CandidateGrid::Uniform { steps: 0 } = config.candidates {
        errors.push(ValidationError::EmptyGrid);
    }

    for (name, facet) in &config.facets {
        if facet.data.is_some() && facet.ids.is_some() {
            errors.push(ValidationError::AmbiguousFacet(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl From<ValidationError> for ft_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::CostRatio(value) => ft_common::Error::InvalidCostRatio { value },
            ValidationError::EmptyGrid => ft_common::Error::InvalidGrid(err.to_string()),
            ValidationError::AmbiguousFacet(_) => ft_common::Error::Config(err.to_string()),
        }
    }
}
