//! Error types for the cooc-matrix library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CoocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{column}' in input header")]
    MissingColumn { column: String },

    #[error("Invalid frequency '{value}' at data row {row}")]
    InvalidFrequency { value: String, row: usize },

    #[error("Invalid count value '{value}' at row {row}, column {col}")]
    InvalidCount {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty matrix: {0}")]
    EmptyMatrix(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, CoocError>;
