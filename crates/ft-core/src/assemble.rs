//! Result records and the report envelope.

use crate::threshold::{FacetEvaluations, PerStrategy, Threshold, ThresholdEvaluation};
use chrono::{DateTime, Utc};
use ft_common::{RunId, SCHEMA_VERSION};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds for one scored output field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdResult {
    /// Model output field the thresholds apply to.
    pub pred_key: String,
    /// facet → strategy → threshold (`null` when undefined).
    pub thresholds: BTreeMap<String, PerStrategy<Threshold>>,
    /// facet → strategy → confusion counts behind each threshold.
    pub evaluations: BTreeMap<String, PerStrategy<Option<ThresholdEvaluation>>>,
}

impl ThresholdResult {
    pub fn threshold(&self, facet: &str, strategy: crate::threshold::Strategy) -> Option<Threshold> {
        self.thresholds.get(facet).map(|t| *t.get(strategy))
    }
}

/// Package one field's strategy table.
pub fn assemble(pred_key: &str, table: BTreeMap<String, FacetEvaluations>) -> ThresholdResult {
    let thresholds = table
        .iter()
        .map(|(facet, evals)| (facet.clone(), evals.thresholds()))
        .collect();
    ThresholdResult {
        pred_key: pred_key.to_string(),
        thresholds,
        evaluations: table,
    }
}

/// Envelope written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdReport {
    pub schema_version: String,
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub cost_ratio: f64,
    pub results: Vec<ThresholdResult>,
}

impl ThresholdReport {
    pub fn new(cost_ratio: f64, results: Vec<ThresholdResult>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: RunId::new(),
            generated_at: Utc::now(),
            cost_ratio,
            results,
        }
    }

    /// One line per field, facet and strategy.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            for (facet, thresholds) in &result.thresholds {
                let facet = if facet.is_empty() { "(all)" } else { facet };
                for strategy in crate::threshold::Strategy::ALL {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\n",
                        result.pred_key,
                        facet,
                        strategy,
                        thresholds.get(strategy)
                    ));
                }
            }
        }
        out
    }
}
