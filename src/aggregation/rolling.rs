use crate::aggregation::error::AggregationError;
use crate::types::series::{RollingPoint, RollingSeries, TemperatureSeries};

/// Centered moving average over `window` consecutive days.
///
/// With `half = window / 2`, position `i` gets the mean of the `window` values starting
/// at `i - half`, provided `half <= i < len - half`. Every other position is absent
/// rather than averaged over a partial window, and so is any position whose window
/// contains a missing reading.
///
/// # Errors
///
/// Returns [`AggregationError::InvalidWindow`] if `window` is zero.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use mintemp::{rolling_average, TemperatureSeries};
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let series = TemperatureSeries::daily(start, [1.0, 2.0, 3.0, 4.0, 5.0].map(Some));
/// let smoothed = rolling_average(&series, 3).unwrap();
/// assert_eq!(
///     smoothed.values().collect::<Vec<_>>(),
///     vec![None, Some(2.0), Some(3.0), Some(4.0), None]
/// );
/// ```
pub fn rolling_average(
    series: &TemperatureSeries,
    window: usize,
) -> Result<RollingSeries, AggregationError> {
    if window == 0 {
        return Err(AggregationError::InvalidWindow);
    }

    let values: Vec<Option<f64>> = series.values().collect();
    let len = values.len();
    let half = window / 2;

    let points = series
        .readings()
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            let value = if i >= half && i + half < len {
                let slice = &values[i - half..i - half + window];
                slice
                    .iter()
                    .copied()
                    .sum::<Option<f64>>()
                    .map(|sum| sum / window as f64)
            } else {
                None
            };
            RollingPoint {
                timestamp: reading.timestamp,
                value,
            }
        })
        .collect();

    Ok(RollingSeries { window, points })
}
