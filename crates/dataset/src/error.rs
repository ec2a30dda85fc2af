use thiserror::Error;

/// Failures while preparing a dataset. Any of these aborts the whole load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    /// Row numbers are 1-based positions in the raw input.
    #[error("row {row}: malformed order date {value:?}")]
    MalformedDate { row: usize, value: String },

    #[error("row {row}: empty product category")]
    EmptyCategory { row: usize },

    #[error("need at least one training and one holdout row, got {rows} row(s)")]
    InsufficientRows { rows: usize },

    #[error("invalid split configuration: {0}")]
    InvalidSplit(String),
}
