//! Error types for facet threshold computation.

use thiserror::Error;

/// Result type alias for threshold operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for threshold computation.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cost ratio must be a positive finite number, got {value}")]
    InvalidCostRatio { value: f64 },

    #[error("facet '{facet}' references unknown example id {id}")]
    UnknownFacetMember { facet: String, id: String },

    #[error("label value {value} for field '{field}' is not in vocabulary {vocab:?}")]
    UnrecognizedLabel {
        field: String,
        value: String,
        vocab: Vec<String>,
    },

    #[error("model has no binary classification output with a label field in the dataset")]
    NoCompatibleOutput,

    #[error("invalid candidate grid: {0}")]
    InvalidGrid(String),

    // Data errors (20-29)
    #[error("example {id} is missing label field '{field}'")]
    MissingLabel { id: String, field: String },

    #[error("malformed model output for example {index}, field '{field}': {reason}")]
    MalformedOutput {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("model returned {actual} outputs for {expected} examples")]
    OutputCountMismatch { expected: usize, actual: usize },

    // Model errors (30-39)
    #[error("model prediction failed: {0}")]
    Model(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidCostRatio { .. } => 11,
            Error::UnknownFacetMember { .. } => 12,
            Error::UnrecognizedLabel { .. } => 13,
            Error::NoCompatibleOutput => 14,
            Error::InvalidGrid(_) => 15,
            Error::MissingLabel { .. } => 20,
            Error::MalformedOutput { .. } => 21,
            Error::OutputCountMismatch { .. } => 22,
            Error::Model(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// True for errors that reject the request before any search runs.
    pub fn is_config(&self) -> bool {
        (10..20).contains(&self.code())
    }
}
