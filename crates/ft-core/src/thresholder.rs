//! Entry point: examples + model + dataset + config → thresholds per field.

use crate::assemble::{assemble, ThresholdResult};
use crate::facets::partition;
use crate::model::{Dataset, Model};
use crate::scoring::{score_examples, ScoredExample};
use crate::threshold::{run_strategies, CostRatio, ScoredPair};
use ft_common::{BinaryHead, Error, IndexedExample, JsonDict, Result};
use ft_config::{validate, ThresholderConfig};
use std::borrow::Cow;

/// Computes cost-aware thresholds for every binary head of a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thresholder;

impl Thresholder {
    pub fn new() -> Self {
        Self
    }

    /// Binary heads of `model` whose label field exists in `dataset`.
    pub fn binary_heads(model: &dyn Model, dataset: &dyn Dataset) -> Vec<BinaryHead> {
        model
            .output_spec()
            .fields()
            .filter_map(|field| field.binary_head(dataset.spec()))
            .collect()
    }

    pub fn is_compatible(model: &dyn Model, dataset: &dyn Dataset) -> bool {
        !Self::binary_heads(model, dataset).is_empty()
    }

    /// Compute thresholds for each binary head, in the model's field order.
    ///
    /// `model_outputs` must be parallel to `examples` when given; otherwise
    /// the model is asked for them. `config` defaults to cost ratio 1 and a
    /// single whole-dataset facet.
    pub fn run_with_metadata(
        &self,
        examples: &[IndexedExample],
        model: &dyn Model,
        dataset: &dyn Dataset,
        model_outputs: Option<&[JsonDict]>,
        config: Option<&ThresholderConfig>,
    ) -> Result<Vec<ThresholdResult>> {
        let config = config.cloned().unwrap_or_default();
        if let Err(mut errors) = validate(&config) {
            return Err(errors.remove(0).into());
        }
        let cost_ratio = CostRatio::new(config.cost_ratio)?;

        let heads = Self::binary_heads(model, dataset);
        if heads.is_empty() {
            return Err(Error::NoCompatibleOutput);
        }

        let facets = partition(&config.facets, examples)?;

        let outputs: Cow<'_, [JsonDict]> = match model_outputs {
            Some(outputs) => Cow::Borrowed(outputs),
            None => Cow::Owned(model.predict_with_metadata(examples)?),
        };

        let results = heads
            .iter()
            .map(|head| {
                let scored = score_examples(head, examples, &outputs)?;
                let pairs: Vec<ScoredPair> = scored.iter().map(ScoredExample::pair).collect();
                let table = run_strategies(&pairs, &facets, cost_ratio, config.candidates);
                Ok(assemble(&head.pred_key, table))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            target: "thresholder.run",
            examples = examples.len(),
            facets = facets.len(),
            fields = results.len(),
            cost_ratio = cost_ratio.get(),
            "Computed thresholds"
        );
        Ok(results)
    }
}
