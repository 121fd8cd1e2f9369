// src/error.rs
use thiserror::Error;

/// Errors raised while resolving pattern consensus or evaluating strategy rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// A qualified label produced in the multi-match branch has no rank.
    #[error("Pattern {label} has no entry in the rank table")]
    UnrankedPattern { label: String },

    /// The configured pattern enumeration is empty.
    #[error("Pattern identifier enumeration is empty")]
    EmptySignalSet,

    #[error("Pattern identifier {identifier} is listed more than once")]
    DuplicateIdentifier { identifier: String },

    #[error("Pattern identifier {identifier} is on the exclusion list")]
    ExcludedIdentifier { identifier: String },

    #[error("Signal row has {actual} values, expected {expected}")]
    RowWidthMismatch { expected: usize, actual: usize },

    #[error("No signal column for pattern {identifier}")]
    MissingPatternColumn { identifier: String },

    #[error("Row {index} is out of range, provider has {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Indicator column {name} is not present")]
    MissingIndicator { name: String },

    #[error("Column {name} has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Rank for {label} must be positive")]
    InvalidRank { label: String },
}

pub type Result<T> = std::result::Result<T, SignalError>;
