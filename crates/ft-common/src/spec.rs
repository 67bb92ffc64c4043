//! Dataset and model field specs.
//!
//! A dataset describes its input fields; a model describes its output fields.
//! Thresholds are only meaningful for binary `MulticlassPreds` outputs whose
//! `parent` names a `CategoryLabel` field in the dataset.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type descriptor for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum FieldSpec {
    /// Free text input.
    TextSegment,
    /// Categorical ground-truth label.
    CategoryLabel { vocab: Vec<String> },
    /// Probability vector over `vocab`, optionally tied to a label field.
    MulticlassPreds {
        vocab: Vec<String>,
        #[serde(default)]
        parent: Option<String>,
        /// Index of the "negative" / background class, if any.
        #[serde(default)]
        null_idx: Option<usize>,
    },
    /// Real-valued output or input.
    Scalar,
}

/// Field spec of a dataset, keyed by field name.
pub type DatasetSpec = BTreeMap<String, FieldSpec>;

/// A named model output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutputField {
    pub name: String,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

/// Model output spec in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OutputSpec(pub Vec<OutputField>);

impl OutputSpec {
    pub fn fields(&self) -> impl Iterator<Item = &OutputField> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.spec)
    }
}

/// A binary classification head resolved against a dataset spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHead {
    /// Output field holding the probability vector.
    pub pred_key: String,
    /// Dataset field holding the ground-truth label.
    pub label_field: String,
    /// Output vocabulary, length 2.
    pub vocab: Vec<String>,
    /// Vocabulary of the label field in the dataset, length 2.
    pub label_vocab: Vec<String>,
    /// Index of the positive class in both vocabularies.
    pub positive_idx: usize,
}

impl BinaryHead {
    /// Label value that counts as positive, named by the dataset.
    pub fn positive_label(&self) -> &str {
        &self.label_vocab[self.positive_idx]
    }
}

impl OutputField {
    /// Resolve this field as a binary head, if it is one.
    ///
    /// The positive class is the entry that is not `null_idx`; with no
    /// `null_idx` it is index 1. Labels are read against the parent's
    /// `CategoryLabel` vocabulary, which must also have two entries.
    pub fn binary_head(&self, dataset: &DatasetSpec) -> Option<BinaryHead> {
        let FieldSpec::MulticlassPreds {
            vocab,
            parent,
            null_idx,
        } = &self.spec
        else {
            return None;
        };
        if vocab.len() != 2 {
            return None;
        }
        let label_field = parent.as_ref()?;
        let label_vocab = match dataset.get(label_field)? {
            FieldSpec::CategoryLabel { vocab } if vocab.len() == 2 => vocab.clone(),
            _ => return None,
        };
        let positive_idx = match null_idx {
            Some(0) => 1,
            Some(1) => 0,
            Some(_) => return None,
            None => 1,
        };
        Some(BinaryHead {
            pred_key: self.name.clone(),
            label_field: label_field.clone(),
            vocab: vocab.clone(),
            label_vocab,
            positive_idx,
        })
    }
}
