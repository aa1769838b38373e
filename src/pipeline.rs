//! Composes the archive client, the normalizer and the aggregation engine into the
//! outputs a dashboard renders: the series with its overlays, the highlighted plot
//! points and the threshold table.

use crate::aggregation::error::AggregationError;
use crate::aggregation::rolling::rolling_average;
use crate::aggregation::thresholds::threshold_table;
use crate::error::MinTempError;
use crate::series::normalize::normalize;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::series::{
    RollingSeries, RollingWindow, TemperatureSeries, DATE_COLUMN, VALUE_COLUMN,
};
use crate::types::threshold_range::ThresholdRange;
use crate::types::threshold_table::ThresholdTable;
use crate::types::unit::Unit;
use crate::weather::archive_client::ArchiveClient;
use chrono::{DateTime, Utc};
use log::debug;
use polars::prelude::*;
use serde::Serialize;

/// Everything that forces a refetch and recomputation when it changes.
///
/// The plot threshold is deliberately absent: moving it only re-derives the
/// highlighted points, see [`PipelineOutput::with_plot_threshold`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineKey {
    pub location: Location,
    pub date_range: DateRange,
    pub unit: Unit,
    pub table_range: ThresholdRange,
}

/// A point of the plotted series, flagged when it lies below the plot threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
    pub below_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub key: PipelineKey,
    pub series: TemperatureSeries,
    pub weekly: Option<RollingSeries>,
    pub monthly: Option<RollingSeries>,
    pub table: ThresholdTable,
    pub plot_threshold: f64,
    pub plot: Vec<PlotPoint>,
}

impl PipelineOutput {
    /// Derives every output from an already normalized series.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::InsufficientData`] if `series` is empty.
    pub fn from_series(
        key: PipelineKey,
        series: TemperatureSeries,
        plot_threshold: f64,
        overlays: &[RollingWindow],
    ) -> Result<Self, AggregationError> {
        let table = threshold_table(&series, key.table_range)?;

        let overlay = |window: RollingWindow| -> Result<Option<RollingSeries>, AggregationError> {
            if overlays.contains(&window) {
                rolling_average(&series, window.days()).map(Some)
            } else {
                Ok(None)
            }
        };
        let weekly = overlay(RollingWindow::Weekly)?;
        let monthly = overlay(RollingWindow::Monthly)?;

        let plot = plot_points(&series, plot_threshold);
        Ok(Self {
            key,
            series,
            weekly,
            monthly,
            table,
            plot_threshold,
            plot,
        })
    }

    /// Re-flags the plot points for a new threshold. Nothing is refetched.
    pub fn with_plot_threshold(mut self, plot_threshold: f64) -> Self {
        self.plot = plot_points(&self.series, plot_threshold);
        self.plot_threshold = plot_threshold;
        self
    }

    pub fn overlay(&self, window: RollingWindow) -> Option<&RollingSeries> {
        match window {
            RollingWindow::Weekly => self.weekly.as_ref(),
            RollingWindow::Monthly => self.monthly.as_ref(),
        }
    }

    /// Number of plotted days below the plot threshold.
    pub fn days_below_plot_threshold(&self) -> usize {
        self.plot.iter().filter(|p| p.below_threshold).count()
    }

    /// The series and its overlays as one `DataFrame`: `date`, `temperature_2m_min`,
    /// then `weekly_avg` and `monthly_avg` for the overlays that were computed.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![
            Column::new(DATE_COLUMN.into(), self.series.naive_timestamps()),
            Column::new(
                VALUE_COLUMN.into(),
                self.series.values().collect::<Vec<_>>(),
            ),
        ];
        for window in [RollingWindow::Weekly, RollingWindow::Monthly] {
            if let Some(rolling) = self.overlay(window) {
                columns.push(Column::new(
                    window.column_name().into(),
                    rolling.values().collect::<Vec<_>>(),
                ));
            }
        }
        DataFrame::new(columns)
    }
}

fn plot_points(series: &TemperatureSeries, plot_threshold: f64) -> Vec<PlotPoint> {
    series
        .readings()
        .iter()
        .map(|reading| PlotPoint {
            timestamp: reading.timestamp,
            value: reading.value,
            below_threshold: reading.value.is_some_and(|v| v < plot_threshold),
        })
        .collect()
}

/// Fetches, normalizes and aggregates the series described by `key`.
///
/// # Errors
///
/// Propagates the archive, normalization and aggregation failures unchanged.
pub async fn run(
    archive: &ArchiveClient,
    key: PipelineKey,
    plot_threshold: f64,
    overlays: &[RollingWindow],
) -> Result<PipelineOutput, MinTempError> {
    let raw = archive
        .daily_minimums(key.location.coordinates, &key.date_range, key.unit)
        .await?;
    let series = normalize(&raw)?;
    debug!(
        "Normalized {} daily readings for {}",
        series.len(),
        key.location.name
    );
    Ok(PipelineOutput::from_series(
        key,
        series,
        plot_threshold,
        overlays,
    )?)
}
