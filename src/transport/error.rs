use reqwest::StatusCode;
use thiserror::Error;

/// Why a single attempt failed in a way worth retrying.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("Network request failed")]
    Network(#[source] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed after {attempts} attempts")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: AttemptFailure,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    Rejected {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to build request URL from '{base}'")]
    InvalidRequest {
        base: String,
        #[source]
        source: url::ParseError,
    },
}

impl TransportError {
    /// HTTP status of the final failure, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Rejected { status, .. } => Some(*status),
            TransportError::Exhausted {
                source: AttemptFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
