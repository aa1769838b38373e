use crate::aggregation::error::AggregationError;
use crate::locations::error::LocationError;
use crate::transport::error::TransportError;
use crate::weather::error::{ArchiveError, MalformedResponseError, UpstreamError};
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinTempError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Lower threshold {lower} is above upper threshold {upper}")]
    InvalidThresholdRange { lower: i32, upper: i32 },

    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    #[error("Failed to parse date '{0}'")]
    DateParsing(String, #[source] chrono::ParseError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}

impl From<ArchiveError> for MinTempError {
    fn from(value: ArchiveError) -> Self {
        match value {
            ArchiveError::Transport(e) => MinTempError::Transport(e),
            ArchiveError::Upstream(e) => MinTempError::Upstream(e),
            ArchiveError::Malformed(e) => MinTempError::MalformedResponse(e),
        }
    }
}
