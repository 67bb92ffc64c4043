//! Thresholder option types.

use ft_common::{ExampleId, IndexedExample};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Equal cost for false positives and false negatives.
pub const DEFAULT_COST_RATIO: f64 = 1.0;

/// Complete thresholder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholderConfig {
    /// Cost of one false positive relative to one false negative.
    #[serde(default = "default_cost_ratio")]
    pub cost_ratio: f64,

    /// Subgroups to compute thresholds for, keyed by display name.
    #[serde(default = "default_facets")]
    pub facets: BTreeMap<String, FacetSpec>,

    /// Which thresholds the search considers.
    #[serde(default)]
    pub candidates: CandidateGrid,
}

fn default_cost_ratio() -> f64 {
    DEFAULT_COST_RATIO
}

fn default_facets() -> BTreeMap<String, FacetSpec> {
    BTreeMap::from([(String::new(), FacetSpec::default())])
}

impl Default for ThresholderConfig {
    fn default() -> Self {
        Self {
            cost_ratio: DEFAULT_COST_RATIO,
            facets: default_facets(),
            candidates: CandidateGrid::default(),
        }
    }
}

impl ThresholderConfig {
    pub fn with_cost_ratio(mut self, cost_ratio: f64) -> Self {
        self.cost_ratio = cost_ratio;
        self
    }

    pub fn with_facet(mut self, name: impl Into<String>, facet: FacetSpec) -> Self {
        self.facets.insert(name.into(), facet);
        self
    }

    /// Replace the default whole-dataset facet with an explicit set.
    pub fn with_facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = (S, FacetSpec)>,
        S: Into<String>,
    {
        self.facets = facets.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }
}

/// A single facet entry.
///
/// With neither `data` nor `ids` the facet covers every example in the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FacetSpec {
    /// Member examples, as selected by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<IndexedExample>>,

    /// Member ids, for callers that do not carry example payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<ExampleId>>,
}

impl FacetSpec {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_data(data: Vec<IndexedExample>) -> Self {
        Self {
            data: Some(data),
            ids: None,
        }
    }

    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ExampleId>,
    {
        Self {
            data: None,
            ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }

    /// True when the facet denotes every example of the run.
    pub fn is_unrestricted(&self) -> bool {
        self.data.is_none() && self.ids.is_none()
    }

    /// Explicit member ids, `None` when unrestricted.
    pub fn member_ids(&self) -> Option<Vec<&ExampleId>> {
        if self.is_unrestricted() {
            return None;
        }
        let from_data = self.data.iter().flatten().map(|ex| &ex.id);
        let from_ids = self.ids.iter().flatten();
        Some(from_data.chain(from_ids).collect())
    }
}

/// Candidate thresholds considered by the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CandidateGrid {
    /// Zero plus every distinct observed probability.
    #[default]
    Observed,
    /// `k / steps` for `k = 0..=steps`.
    Uniform { steps: u32 },
}
