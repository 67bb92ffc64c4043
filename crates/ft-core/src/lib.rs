//! Cost-aware decision thresholds for binary classifiers.
//!
//! Given predicted probabilities and ground-truth labels, picks the threshold
//! minimizing `cost_ratio * FP + FN`, globally, per facet, and per facet under
//! demographic parity.

pub mod assemble;
pub mod exit_codes;
pub mod facets;
pub mod logging;
pub mod model;
pub mod scoring;
pub mod threshold;
pub mod thresholder;

pub use assemble::{ThresholdReport, ThresholdResult};
pub use model::{Dataset, InMemoryDataset, Model, RunBundle, StaticModel};
pub use threshold::{find_threshold, CostRatio, ScoredPair, Strategy, Threshold};
pub use thresholder::Thresholder;
