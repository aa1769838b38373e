//! Client for the Open-Meteo historical archive, restricted to the daily minimum
//! temperature of a single location.

use crate::transport::cached_transport::{CachedTransport, OutboundRequest};
use crate::transport::error::TransportError;
use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::unit::Unit;
use crate::weather::error::{ArchiveError, UpstreamError};
use crate::weather::response::{
    parse_archive_body, service_error_reason, RawSeriesResponse, DAILY_MIN_VARIABLE,
};
use log::info;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Issues daily-minimum requests through a [`CachedTransport`].
///
/// Caching and retries are entirely the transport's job; this client only builds the
/// request and interprets the answer.
pub struct ArchiveClient {
    transport: CachedTransport,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(transport: CachedTransport, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &CachedTransport {
        &self.transport
    }

    /// The exact request sent for a location, date range and unit.
    pub fn request_for(
        &self,
        coordinates: LatLon,
        date_range: &DateRange,
        unit: Unit,
    ) -> Result<OutboundRequest, TransportError> {
        OutboundRequest::get(
            &self.base_url,
            [
                ("latitude", coordinates.latitude().to_string()),
                ("longitude", coordinates.longitude().to_string()),
                ("start_date", date_range.start_param()),
                ("end_date", date_range.end_param()),
                ("daily", DAILY_MIN_VARIABLE.to_string()),
                ("temperature_unit", unit.query_value().to_string()),
                ("timeformat", "unixtime".to_string()),
                ("timezone", "GMT".to_string()),
            ],
        )
    }

    /// Fetches the daily minimum temperatures for one location.
    ///
    /// # Errors
    ///
    /// * [`ArchiveError::Transport`] if the request fails after retries or is rejected
    ///   without an archive error message.
    /// * [`ArchiveError::Upstream`] if the archive reports an error or returns no results.
    /// * [`ArchiveError::Malformed`] if the body cannot be interpreted.
    pub async fn daily_minimums(
        &self,
        coordinates: LatLon,
        date_range: &DateRange,
        unit: Unit,
    ) -> Result<RawSeriesResponse, ArchiveError> {
        let request = self.request_for(coordinates, date_range, unit)?;
        info!(
            "Requesting daily minimums for {} over {} in {}",
            coordinates, date_range, unit
        );

        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(TransportError::Rejected { url, status, body }) => {
                return Err(match service_error_reason(body.as_bytes()) {
                    Some(reason) => UpstreamError::Reported {
                        reason,
                        status: Some(status),
                    }
                    .into(),
                    None => TransportError::Rejected { url, status, body }.into(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        parse_archive_body(&body)
    }
}
