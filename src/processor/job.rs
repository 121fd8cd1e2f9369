use crate::error::SignalError;
use crate::indicators::patterns::ConsensusResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a batch does when a row cannot be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Fail the whole batch with the first failing row's error.
    #[default]
    Abort,
    /// Keep going and report the row as failed.
    MarkFailed,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Abort => write!(f, "abort"),
            ErrorPolicy::MarkFailed => write!(f, "mark_failed"),
        }
    }
}

/// Outcome of classifying one row of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Resolved(ConsensusResult),
    Failed { index: usize, error: SignalError },
}

impl RowOutcome {
    pub fn result(&self) -> Option<&ConsensusResult> {
        match self {
            RowOutcome::Resolved(result) => Some(result),
            RowOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed { .. })
    }
}

impl From<(usize, Result<ConsensusResult, SignalError>)> for RowOutcome {
    fn from((index, outcome): (usize, Result<ConsensusResult, SignalError>)) -> Self {
        match outcome {
            Ok(result) => RowOutcome::Resolved(result),
            Err(error) => RowOutcome::Failed { index, error },
        }
    }
}
