//! Threshold search and the strategies built on it.

pub mod search;
pub mod strategy;

pub use search::{
    find_threshold, search, CandidateCurve, CandidatePoint, Confusion, CostRatio, ScoredPair,
    Threshold, ThresholdEvaluation,
};
pub use strategy::{demographic_parity, run_strategies, FacetEvaluations, PerStrategy, Strategy};
