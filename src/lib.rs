mod aggregation;
mod cache;
mod error;
mod locations;
mod mintemp;
mod pipeline;
mod series;
mod transport;
mod types;
mod utils;
mod weather;

pub use error::MinTempError;
pub use mintemp::*;

pub use aggregation::error::AggregationError;
pub use aggregation::rolling::rolling_average;
pub use aggregation::thresholds::threshold_table;

pub use cache::disk_store::DiskStore;
pub use cache::error::CacheError;
pub use cache::memory_store::MemoryStore;
pub use cache::store::ResponseStore;

pub use locations::error::LocationError;
pub use locations::location_table::{LocationTable, MIN_POPULATION};

pub use pipeline::{run as run_pipeline, PipelineKey, PipelineOutput, PlotPoint};
pub use series::normalize::normalize;

pub use transport::cached_transport::{CachedTransport, OutboundRequest};
pub use transport::error::{AttemptFailure, TransportError};
pub use transport::retry::RetryPolicy;

pub use types::date_range::DateRange;
pub use types::location::{LatLon, Location};
pub use types::series::*;
pub use types::threshold_range::ThresholdRange;
pub use types::threshold_table::*;
pub use types::unit::Unit;

pub use weather::archive_client::{ArchiveClient, ARCHIVE_URL};
pub use weather::error::{ArchiveError, MalformedResponseError, UpstreamError};
pub use weather::response::{RawSeriesResponse, DAILY_MIN_VARIABLE};
