//! Example and run identity types.
//!
//! Example ids are assigned upstream by whatever indexed the dataset; this
//! crate never derives them, it only carries and compares them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON object keyed by field name, as produced by datasets and models.
pub type JsonDict = serde_json::Map<String, serde_json::Value>;

/// Stable example identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ExampleId(pub String);

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExampleId {
    fn from(id: &str) -> Self {
        ExampleId(id.to_string())
    }
}

impl From<String> for ExampleId {
    fn from(id: String) -> Self {
        ExampleId(id)
    }
}

/// An input record together with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IndexedExample {
    pub id: ExampleId,
    pub data: JsonDict,
}

impl IndexedExample {
    pub fn new(id: impl Into<ExampleId>, data: JsonDict) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Run ID attached to reports and log spans.
///
/// Format: `run-<date>-<time>-<random>`
/// Example: `run-20260115-143022-abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .to_string()
            .chars()
            .take(6)
            .collect();
        RunId(format!("run-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
