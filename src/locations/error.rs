use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Failed to read location CSV '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("I/O error writing location CSV '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing location CSV '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),

    #[error("Column '{column}' missing or mistyped in '{path}'")]
    MissingColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Row {row} of '{path}' has no value for '{column}'")]
    MissingValue {
        path: PathBuf,
        row: usize,
        column: String,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
