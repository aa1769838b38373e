use crate::transport::error::TransportError;
use reqwest::StatusCode;
use thiserror::Error;

/// The archive answered, but without usable data for the request.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Archive reported an error: {reason}")]
    Reported {
        reason: String,
        status: Option<StatusCode>,
    },

    #[error("Archive returned no results for the requested location")]
    NoResults,
}

/// The response contradicts its own structure. Never retried.
#[derive(Debug, Error)]
pub enum MalformedResponseError {
    #[error("Failed to decode archive response")]
    Decode(#[from] serde_json::Error),

    #[error("Archive response lacks the daily variable '{0}'")]
    MissingVariable(String),

    #[error("Archive response has an invalid timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("Sampling interval must be positive, got {0}s")]
    InvalidInterval(i64),

    #[error("Time axis spans {span}s, which is not a whole number of {interval}s intervals")]
    UnalignedTimeAxis { span: i64, interval: i64 },

    #[error("Time axis has {expected} samples but {found} values were returned")]
    SampleCountMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Malformed(#[from] MalformedResponseError),
}
