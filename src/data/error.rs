use thiserror::Error;

use super::kind::TimeDataKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Inconsistent data: {0}")]
    DataConsistency(String),
    #[error("Records cannot be combined: {0}")]
    TimelineMismatch(TimelineMismatch),
    #[error("Cannot extract {requested} from a record holding {available}")]
    UnavailableKind {
        requested: TimeDataKind,
        available: TimeDataKind,
    },
    #[error("Invalid load pattern: {0}")]
    InvalidLoad(String),
}

/// Why two time series records cannot be combined element by element
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineMismatch {
    #[error("data kinds differ ({left} vs {right})")]
    Kind {
        left: TimeDataKind,
        right: TimeDataKind,
    },
    #[error("records holding only time cannot be combined")]
    TimeOnly,
    #[error("time arrays differ in length ({left} vs {right})")]
    Length { left: usize, right: usize },
    #[error("time arrays differ at index {index}")]
    Values { index: usize },
}

impl From<TimelineMismatch> for DataError {
    fn from(mismatch: TimelineMismatch) -> Self {
        DataError::TimelineMismatch(mismatch)
    }
}
