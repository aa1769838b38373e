use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Cannot summarize an empty series")]
    InsufficientData,

    #[error("Rolling window must span at least one day")]
    InvalidWindow,
}
