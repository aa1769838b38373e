//! Canonical time-indexed series produced by the normalizer and the rolling averages
//! derived from them.

use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;
use serde::Serialize;

pub(crate) const DATE_COLUMN: &str = "date";
pub(crate) const VALUE_COLUMN: &str = "temperature_2m_min";

/// One day of the series. `value` is `None` when the archive has no reading for the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Daily minimum temperatures, one reading per day, ascending by timestamp.
///
/// Gaps reported by the archive are kept as readings without a value; nothing is
/// interpolated. The series is immutable once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TemperatureSeries {
    readings: Vec<TemperatureReading>,
}

impl TemperatureSeries {
    /// Wraps readings that are already in chronological order.
    pub fn new(readings: Vec<TemperatureReading>) -> Self {
        Self { readings }
    }

    /// Builds a daily series starting at `start`, one reading per value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use mintemp::TemperatureSeries;
    ///
    /// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    /// let series = TemperatureSeries::daily(start, [Some(5.0), None, Some(8.0)]);
    /// assert_eq!(series.len(), 3);
    /// assert_eq!(series.readings()[2].timestamp.to_string(), "2023-01-03 00:00:00 UTC");
    /// ```
    pub fn daily(start: DateTime<Utc>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let readings = values
            .into_iter()
            .enumerate()
            .map(|(day, value)| TemperatureReading {
                timestamp: start + chrono::Duration::days(day as i64),
                value,
            })
            .collect();
        Self { readings }
    }

    pub fn readings(&self) -> &[TemperatureReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.readings.iter().map(|r| r.value)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.readings.iter().map(|r| r.timestamp)
    }

    pub(crate) fn naive_timestamps(&self) -> Vec<NaiveDateTime> {
        self.timestamps().map(|t| t.naive_utc()).collect()
    }

    /// Converts the series into a two-column Polars `DataFrame`
    /// (`date`, `temperature_2m_min`).
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new(DATE_COLUMN.into(), self.naive_timestamps()),
            Column::new(VALUE_COLUMN.into(), self.values().collect::<Vec<_>>()),
        ])
    }
}

/// The two smoothing overlays offered for the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RollingWindow {
    /// 7-day centered average.
    Weekly,
    /// 30-day centered average.
    Monthly,
}

impl RollingWindow {
    pub fn days(&self) -> usize {
        match self {
            RollingWindow::Weekly => 7,
            RollingWindow::Monthly => 30,
        }
    }

    pub(crate) fn column_name(&self) -> &'static str {
        match self {
            RollingWindow::Weekly => "weekly_avg",
            RollingWindow::Monthly => "monthly_avg",
        }
    }
}

/// A point of a rolling average; `value` is `None` where the window does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Centered moving average aligned one-to-one with its source series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingSeries {
    pub window: usize,
    pub points: Vec<RollingPoint>,
}

impl RollingSeries {
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|p| p.value)
    }
}
