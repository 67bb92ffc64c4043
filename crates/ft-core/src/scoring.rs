//! Pairing model scores with ground-truth labels.

use crate::threshold::ScoredPair;
use ft_common::{BinaryHead, Error, ExampleId, IndexedExample, JsonDict, Result};
use serde_json::Value;

/// One evaluated example.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredExample {
    pub id: ExampleId,
    /// Whether the ground-truth label is the positive class.
    pub positive: bool,
    /// Predicted probability of the positive class.
    pub probability: f64,
}

impl ScoredExample {
    pub fn pair(&self) -> ScoredPair {
        ScoredPair::new(self.probability, self.positive)
    }
}

/// Score every example for one binary head.
///
/// Labels outside the dataset vocabulary are configuration errors; outputs
/// that are not a probability vector over the head's vocabulary are data
/// errors.
pub fn score_examples(
    head: &BinaryHead,
    examples: &[IndexedExample],
    outputs: &[JsonDict],
) -> Result<Vec<ScoredExample>> {
    if examples.len() != outputs.len() {
        return Err(Error::OutputCountMismatch {
            expected: examples.len(),
            actual: outputs.len(),
        });
    }

    examples
        .iter()
        .zip(outputs)
        .enumerate()
        .map(|(index, (example, output))| {
            Ok(ScoredExample {
                id: example.id.clone(),
                positive: label_is_positive(head, example)?,
                probability: positive_probability(head, index, output)?,
            })
        })
        .collect()
}

fn label_is_positive(head: &BinaryHead, example: &IndexedExample) -> Result<bool> {
    let raw = example
        .data
        .get(&head.label_field)
        .ok_or_else(|| Error::MissingLabel {
            id: example.id.to_string(),
            field: head.label_field.clone(),
        })?;
    let label = match raw {
        Value::String(s) => s.clone(),
        // Whole floats print without a fraction, so 1.0 reads as "1".
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if !head.label_vocab.iter().any(|v| *v == label) {
        return Err(Error::UnrecognizedLabel {
            field: head.label_field.clone(),
            value: label,
            vocab: head.label_vocab.clone(),
        });
    }
    Ok(label == head.positive_label())
}

fn positive_probability(head: &BinaryHead, index: usize, output: &JsonDict) -> Result<f64> {
    let malformed = |reason: String| Error::MalformedOutput {
        index,
        field: head.pred_key.clone(),
        reason,
    };
    let scores = output
        .get(&head.pred_key)
        .ok_or_else(|| malformed("field missing".to_string()))?
        .as_array()
        .ok_or_else(|| malformed("expected a probability vector".to_string()))?;
    if scores.len() != head.vocab.len() {
        return Err(malformed(format!(
            "expected {} scores, got {}",
            head.vocab.len(),
            scores.len()
        )));
    }
    let p = scores[head.positive_idx]
        .as_f64()
        .ok_or_else(|| malformed("score is not a number".to_string()))?;
    if !(0.0..=1.0).contains(&p) {
        return Err(malformed(format!("probability {p} outside [0, 1]")));
    }
    Ok(p)
}
