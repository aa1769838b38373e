//! Turns the archive's (start, end, interval) time metadata into explicit readings.

use crate::types::series::{TemperatureReading, TemperatureSeries};
use crate::weather::error::MalformedResponseError;
use crate::weather::response::RawSeriesResponse;
use chrono::Duration;

/// Pairs every value of `raw` with its timestamp `start + k * interval`.
///
/// The slot starting at `end` is excluded, so a well-formed response has exactly
/// `(end - start) / interval` values.
///
/// # Errors
///
/// Returns a [`MalformedResponseError`] if the interval is not positive, the span is
/// not a whole number of intervals, or the value count differs from the slot count.
pub fn normalize(raw: &RawSeriesResponse) -> Result<TemperatureSeries, MalformedResponseError> {
    let interval = raw.interval_seconds;
    if interval <= 0 {
        return Err(MalformedResponseError::InvalidInterval(interval));
    }

    let span = (raw.end - raw.start).num_seconds();
    if span < 0 || span % interval != 0 {
        return Err(MalformedResponseError::UnalignedTimeAxis { span, interval });
    }

    let expected = (span / interval) as usize;
    if expected != raw.values.len() {
        return Err(MalformedResponseError::SampleCountMismatch {
            expected,
            found: raw.values.len(),
        });
    }

    let readings = raw
        .values
        .iter()
        .enumerate()
        .map(|(k, value)| TemperatureReading {
            timestamp: raw.start + Duration::seconds(interval * k as i64),
            value: *value,
        })
        .collect();

    Ok(TemperatureSeries::new(readings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::location::LatLon;
    use chrono::{DateTime, TimeZone, Utc};

    fn raw(start: DateTime<Utc>, slots: i64, interval: i64, values: Vec<Option<f64>>) -> RawSeriesResponse {
        RawSeriesResponse {
            start,
            end: start + Duration::seconds(slots * interval),
            interval_seconds: interval,
            values,
            unit_label: None,
            coordinates: LatLon(0.0, 0.0),
            utc_offset_seconds: 0,
        }
    }

    #[test]
    fn test_timestamps_are_left_inclusive() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let response = raw(start, 3, 86_400, vec![Some(1.0), Some(2.0), None]);

        let series = normalize(&response).unwrap();

        let timestamps: Vec<_> = series.timestamps().collect();
        assert_eq!(timestamps.len(), 3);
        assert_eq!(timestamps[0], start);
        for pair in timestamps.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_seconds(), 86_400);
        }
        assert!(*timestamps.last().unwrap() < response.end);
        assert_eq!(series.values().collect::<Vec<_>>(), vec![Some(1.0), Some(2.0), None]);
    }

    #[test]
    fn test_hourly_interval() {
        let start = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        let response = raw(start, 24, 3_600, vec![Some(0.0); 24]);

        let series = normalize(&response).unwrap();
        assert_eq!(
            series.readings()[23].timestamp,
            Utc.with_ymd_and_hms(2022, 6, 1, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_axis() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let series = normalize(&raw(start, 0, 86_400, vec![])).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let err = normalize(&raw(start, 3, 86_400, vec![Some(1.0); 2])).unwrap_err();
        assert!(matches!(
            err,
            MalformedResponseError::SampleCountMismatch { expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_invalid_interval() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let mut response = raw(start, 1, 86_400, vec![Some(1.0)]);
        response.interval_seconds = 0;
        assert!(matches!(
            normalize(&response),
            Err(MalformedResponseError::InvalidInterval(0))
        ));
    }

    #[test]
    fn test_unaligned_span() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let mut response = raw(start, 2, 86_400, vec![Some(1.0); 2]);
        response.end = response.end + Duration::seconds(1);
        assert!(matches!(
            normalize(&response),
            Err(MalformedResponseError::UnalignedTimeAxis { .. })
        ));
    }
}
