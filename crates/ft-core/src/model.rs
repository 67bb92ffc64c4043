//! Model and dataset seams.
//!
//! The thresholder never trains or runs a classifier itself. It sees a model
//! only through its output spec and, when outputs are not supplied, through
//! `predict_with_metadata`.

use ft_common::{DatasetSpec, Error, ExampleId, IndexedExample, JsonDict, OutputSpec, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fitted model producing one output dict per example.
pub trait Model {
    fn output_spec(&self) -> &OutputSpec;

    fn predict_with_metadata(&self, examples: &[IndexedExample]) -> Result<Vec<JsonDict>>;
}

/// A dataset exposing its field spec.
pub trait Dataset {
    fn spec(&self) -> &DatasetSpec;
}

/// Model backed by stored predictions, keyed by example id.
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    spec: OutputSpec,
    predictions: HashMap<ExampleId, JsonDict>,
}

impl StaticModel {
    pub fn new(spec: OutputSpec) -> Self {
        Self {
            spec,
            predictions: HashMap::new(),
        }
    }

    /// Store outputs parallel to `examples`.
    pub fn from_outputs(
        spec: OutputSpec,
        examples: &[IndexedExample],
        outputs: Vec<JsonDict>,
    ) -> Result<Self> {
        if examples.len() != outputs.len() {
            return Err(Error::OutputCountMismatch {
                expected: examples.len(),
                actual: outputs.len(),
            });
        }
        let predictions = examples
            .iter()
            .map(|ex| ex.id.clone())
            .zip(outputs)
            .collect();
        Ok(Self { spec, predictions })
    }
}

impl Model for StaticModel {
    fn output_spec(&self) -> &OutputSpec {
        &self.spec
    }

    fn predict_with_metadata(&self, examples: &[IndexedExample]) -> Result<Vec<JsonDict>> {
        examples
            .iter()
            .map(|ex| {
                self.predictions
                    .get(&ex.id)
                    .cloned()
                    .ok_or_else(|| Error::Model(format!("no stored prediction for {}", ex.id)))
            })
            .collect()
    }
}

/// Dataset described only by its field spec; examples travel separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDataset {
    pub spec: DatasetSpec,
}

impl InMemoryDataset {
    pub fn new(spec: DatasetSpec) -> Self {
        Self { spec }
    }
}

impl Dataset for InMemoryDataset {
    fn spec(&self) -> &DatasetSpec {
        &self.spec
    }
}

/// Everything one CLI run needs, as read from an input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBundle {
    pub examples: Vec<IndexedExample>,
    pub dataset_spec: DatasetSpec,
    pub output_spec: OutputSpec,
    pub model_outputs: Vec<JsonDict>,
}

impl RunBundle {
    /// Parse a bundle from its JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Split into the collaborators `Thresholder::run_with_metadata` takes.
    pub fn into_parts(self) -> Result<(Vec<IndexedExample>, StaticModel, InMemoryDataset, Vec<JsonDict>)> {
        let model = StaticModel::from_outputs(
            self.output_spec,
            &self.examples,
            self.model_outputs.clone(),
        )?;
        let dataset = InMemoryDataset::new(self.dataset_spec);
        Ok((self.examples, model, dataset, self.model_outputs))
    }
}
