//! Main entry point: a client for daily minimum temperatures and the statistics
//! derived from them.

use crate::cache::disk_store::DiskStore;
use crate::cache::store::ResponseStore;
use crate::error::MinTempError;
use crate::pipeline::{self, PipelineKey, PipelineOutput};
use crate::series::normalize::normalize;
use crate::transport::cached_transport::CachedTransport;
use crate::transport::retry::RetryPolicy;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::series::{RollingWindow, TemperatureSeries};
use crate::types::threshold_range::ThresholdRange;
use crate::types::unit::Unit;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather::archive_client::{ArchiveClient, ARCHIVE_URL};
use bon::bon;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// The main client for fetching daily minimum temperatures.
///
/// Every archive response is cached indefinitely, keyed by the exact request, so
/// asking for the same location, date range and unit twice only hits the network
/// once. By default the cache lives on disk in the platform cache directory.
///
/// Create an instance using [`MinTemp::new()`], [`MinTemp::with_cache_folder()`]
/// or the [`MinTemp::configured()`] builder.
///
/// # Examples
///
/// ```rust,no_run
/// # use mintemp::{DateRange, LatLon, MinTemp, MinTempError, Unit};
/// # #[tokio::main]
/// # async fn main() -> Result<(), MinTempError> {
/// let client = MinTemp::new().await?;
/// let output = client
///     .pipeline()
///     .location(LatLon(40.1106, -88.2073))
///     .date_range(DateRange::parse("2022-01-01", "2024-01-01")?)
///     .unit(Unit::Fahrenheit)
///     .call()
///     .await?;
///
/// for row in &output.table.rows {
///     println!("{:>4} {:>5} {:.3}", row.threshold, row.days_below, row.proportion_below);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MinTemp {
    archive: ArchiveClient,
}

#[bon]
impl MinTemp {
    /// Creates a client caching responses in `cache_folder`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, MinTempError> {
        Self::configured().cache_folder(cache_folder).call().await
    }

    /// Creates a client using the default cache directory
    /// (e.g. `~/.cache/mintemp_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::CacheDirResolution`] if the default cache directory
    /// cannot be found, or [`MinTempError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, MinTempError> {
        Self::configured().call().await
    }

    /// Creates a client with explicit settings. Every setting is optional.
    ///
    /// * `.cache_folder(PathBuf)`: directory of the on-disk cache.
    /// * `.store(Arc<dyn ResponseStore>)`: any response store; takes precedence over
    ///   `cache_folder`.
    /// * `.archive_url(..)`: base URL of the archive endpoint.
    /// * `.retry_policy(RetryPolicy)`: attempts and backoff for transient failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use mintemp::{MemoryStore, MinTemp, MinTempError, RetryPolicy};
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), MinTempError> {
    /// let client = MinTemp::configured()
    ///     .store(Arc::new(MemoryStore::new()))
    ///     .retry_policy(RetryPolicy::new(3, 0.5))
    ///     .call()
    ///     .await?;
    /// assert_eq!(client.retry_policy().max_attempts, 3);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn configured(
        cache_folder: Option<PathBuf>,
        store: Option<Arc<dyn ResponseStore>>,
        #[builder(into)] archive_url: Option<String>,
        retry_policy: Option<RetryPolicy>,
    ) -> Result<Self, MinTempError> {
        let store: Arc<dyn ResponseStore> = match store {
            Some(store) => store,
            None => {
                let cache_folder = match cache_folder {
                    Some(folder) => folder,
                    None => get_cache_dir().map_err(MinTempError::CacheDirResolution)?,
                };
                ensure_cache_dir_exists(&cache_folder)
                    .await
                    .map_err(|e| MinTempError::CacheDirCreation(cache_folder.clone(), e))?;
                info!("Caching archive responses in {:?}", cache_folder);
                Arc::new(DiskStore::new(&cache_folder))
            }
        };

        let transport = CachedTransport::new(store, retry_policy.unwrap_or_default());
        let archive_url = archive_url.unwrap_or_else(|| ARCHIVE_URL.to_string());
        Ok(Self {
            archive: ArchiveClient::new(transport, archive_url),
        })
    }

    pub fn archive_url(&self) -> &str {
        self.archive.base_url()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.archive.transport().retry_policy()
    }

    /// Fetches the daily minimum temperatures of one location as a normalized series.
    ///
    /// * `.location(..)`: **Required.** A [`Location`] or bare [`crate::LatLon`].
    /// * `.date_range(DateRange)`: **Required.** Inclusive calendar dates.
    /// * `.unit(Unit)`: Defaults to [`Unit::Fahrenheit`].
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::Transport`], [`MinTempError::Upstream`] or
    /// [`MinTempError::MalformedResponse`] when the archive cannot provide the series.
    #[builder]
    pub async fn daily_minimums(
        &self,
        #[builder(into)] location: Location,
        date_range: DateRange,
        unit: Option<Unit>,
    ) -> Result<TemperatureSeries, MinTempError> {
        let raw = self
            .archive
            .daily_minimums(location.coordinates, &date_range, unit.unwrap_or_default())
            .await?;
        Ok(normalize(&raw)?)
    }

    /// Runs the full pipeline: fetch, normalize, smooth and tabulate.
    ///
    /// * `.location(..)`: **Required.** A [`Location`] or bare [`crate::LatLon`].
    /// * `.date_range(DateRange)`: **Required.**
    /// * `.unit(Unit)`: Defaults to [`Unit::Fahrenheit`].
    /// * `.plot_threshold(f64)`: Defaults to [`Unit::default_plot_threshold`].
    /// * `.table_range(ThresholdRange)`: Defaults to [`Unit::default_table_range`].
    /// * `.overlays(Vec<RollingWindow>)`: Defaults to weekly and monthly.
    ///
    /// # Errors
    ///
    /// Everything [`MinTemp::daily_minimums`] can fail with, plus
    /// [`MinTempError::Aggregation`] when the archive returns an empty series.
    #[builder]
    pub async fn pipeline(
        &self,
        #[builder(into)] location: Location,
        date_range: DateRange,
        unit: Option<Unit>,
        plot_threshold: Option<f64>,
        table_range: Option<ThresholdRange>,
        overlays: Option<Vec<RollingWindow>>,
    ) -> Result<PipelineOutput, MinTempError> {
        let unit = unit.unwrap_or_default();
        let key = PipelineKey {
            location,
            date_range,
            unit,
            table_range: table_range.unwrap_or_else(|| unit.default_table_range()),
        };
        let overlays =
            overlays.unwrap_or_else(|| vec![RollingWindow::Weekly, RollingWindow::Monthly]);

        self.run(
            key,
            plot_threshold.unwrap_or_else(|| unit.default_plot_threshold()),
            &overlays,
        )
        .await
    }

    /// Runs the pipeline for an explicit [`PipelineKey`].
    pub async fn run(
        &self,
        key: PipelineKey,
        plot_threshold: f64,
        overlays: &[RollingWindow],
    ) -> Result<PipelineOutput, MinTempError> {
        pipeline::run(&self.archive, key, plot_threshold, overlays).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory_store::MemoryStore;
    use crate::types::location::LatLon;
    use crate::weather::error::UpstreamError;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> serde_json::Value {
        json!({
            "latitude": 40.1,
            "longitude": -88.2,
            "utc_offset_seconds": 0,
            "daily_units": { "temperature_2m_min": "°F" },
            "daily": {
                "time": [1640995200, 1641081600, 1641168000, 1641254400, 1641340800],
                "temperature_2m_min": [5.0, 3.0, 8.0, 1.0, 9.0]
            }
        })
    }

    fn date_range() -> DateRange {
        DateRange::parse("2022-01-01", "2022-01-05").unwrap()
    }

    async fn client(server: &MockServer) -> MinTemp {
        MinTemp::configured()
            .store(Arc::new(MemoryStore::new()))
            .archive_url(format!("{}/v1/archive", server.uri()))
            .retry_policy(RetryPolicy::new(5, 0.001))
            .call()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_daily_minimums() -> Result<(), MinTempError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let series = client(&server)
            .await
            .daily_minimums()
            .location(LatLon(40.1106, -88.2073))
            .date_range(date_range())
            .call()
            .await?;

        assert_eq!(series.len(), 5);
        assert_eq!(
            series.values().collect::<Vec<_>>(),
            vec![Some(5.0), Some(3.0), Some(8.0), Some(1.0), Some(9.0)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_pipeline_defaults_follow_unit() -> Result<(), MinTempError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("temperature_unit", "celsius"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let output = client(&server)
            .await
            .pipeline()
            .location(Location::new("Urbana, Illinois", LatLon(40.1106, -88.2073)))
            .date_range(date_range())
            .unit(Unit::Celsius)
            .call()
            .await?;

        assert_eq!(output.plot_threshold, -15.0);
        assert_eq!(output.key.table_range, ThresholdRange::new(-20, -10)?);
        assert_eq!(output.table.rows.len(), 11);
        assert!(output.weekly.is_some());
        assert!(output.monthly.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_pipeline_explicit_parameters() -> Result<(), MinTempError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let output = client(&server)
            .await
            .pipeline()
            .location(LatLon(40.1106, -88.2073))
            .date_range(date_range())
            .plot_threshold(4.0)
            .table_range(ThresholdRange::new(2, 6)?)
            .overlays(vec![RollingWindow::Weekly])
            .call()
            .await?;

        let proportions: Vec<_> = output
            .table
            .rows
            .iter()
            .map(|r| r.proportion_below)
            .collect();
        assert_eq!(proportions, vec![0.6, 0.4, 0.2, 0.2, 0.2]);
        assert_eq!(output.days_below_plot_threshold(), 2);
        assert!(output.monthly.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_disk_cache_shared_between_clients() -> Result<(), MinTempError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let cache_folder = dir.path().join("nested").join("cache");
        for _ in 0..2 {
            let client = MinTemp::configured()
                .cache_folder(cache_folder.clone())
                .archive_url(format!("{}/v1/archive", server.uri()))
                .call()
                .await?;
            let series = client
                .daily_minimums()
                .location(LatLon(40.1106, -88.2073))
                .date_range(date_range())
                .call()
                .await?;
            assert_eq!(series.len(), 5);
        }
        assert!(cache_folder.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_upstream_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "reason": "End date must not be before start date"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .daily_minimums()
            .location(LatLon(40.1106, -88.2073))
            .date_range(date_range())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MinTempError::Upstream(UpstreamError::Reported { status: None, .. })
        ));
    }
}
