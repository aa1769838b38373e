//! Wire format of the Open-Meteo archive and its conversion into a [`RawSeriesResponse`].

use crate::types::location::LatLon;
use crate::weather::error::{ArchiveError, MalformedResponseError, UpstreamError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub const DAILY_MIN_VARIABLE: &str = "temperature_2m_min";
pub(crate) const DAY_SECONDS: i64 = 86_400;

/// One result object of the archive's JSON response.
#[derive(Debug, Deserialize)]
struct ArchiveResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    utc_offset_seconds: i64,
    #[serde(default)]
    daily_units: HashMap<String, String>,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    /// Epoch seconds, requested with `timeformat=unixtime`.
    time: Vec<i64>,
    #[serde(flatten)]
    variables: HashMap<String, Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    reason: String,
}

/// The archive's answer for one location: a regular time axis and one value per slot.
///
/// The axis is described by `start`, `end` and `interval_seconds`; the first sample is
/// at `start` and the slot starting at `end` is not part of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval_seconds: i64,
    pub values: Vec<Option<f64>>,
    /// Unit label reported by the archive, e.g. `°F`.
    pub unit_label: Option<String>,
    /// Grid cell the archive resolved the requested coordinates to.
    pub coordinates: LatLon,
    pub utc_offset_seconds: i64,
}

/// End of the slot starting at `last`.
fn past_last(last: i64, interval: i64) -> Result<i64, MalformedResponseError> {
    last.checked_add(interval)
        .ok_or(MalformedResponseError::InvalidTimestamp(last))
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, MalformedResponseError> {
    DateTime::from_timestamp(secs, 0).ok_or(MalformedResponseError::InvalidTimestamp(secs))
}

/// If `body` is the archive's error payload (`{"error": true, "reason": ...}`),
/// returns the reason.
pub(crate) fn service_error_reason(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    if value.get("error").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    serde_json::from_value::<ServiceError>(value)
        .ok()
        .map(|e| e.reason)
}

/// Decodes a response body and extracts the daily minimum series of its first result.
pub(crate) fn parse_archive_body(body: &[u8]) -> Result<RawSeriesResponse, ArchiveError> {
    let value: Value = serde_json::from_slice(body).map_err(MalformedResponseError::from)?;

    if value.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = serde_json::from_value::<ServiceError>(value)
            .map_err(MalformedResponseError::from)?
            .reason;
        return Err(UpstreamError::Reported {
            reason,
            status: None,
        }
        .into());
    }

    let first = match value {
        Value::Array(results) => results
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoResults)?,
        single => single,
    };
    let result: ArchiveResult =
        serde_json::from_value(first).map_err(MalformedResponseError::from)?;
    Ok(raw_series_from_result(result)?)
}

fn raw_series_from_result(
    mut result: ArchiveResult,
) -> Result<RawSeriesResponse, MalformedResponseError> {
    let missing = || MalformedResponseError::MissingVariable(DAILY_MIN_VARIABLE.to_string());
    let mut daily = result.daily.take().ok_or_else(missing)?;
    let values = daily
        .variables
        .remove(DAILY_MIN_VARIABLE)
        .ok_or_else(missing)?;

    let (start, interval, end) = match daily.time.as_slice() {
        [] => (0, DAY_SECONDS, 0),
        [only] => (*only, DAY_SECONDS, past_last(*only, DAY_SECONDS)?),
        [first, second, ..] => {
            let interval = second
                .checked_sub(*first)
                .ok_or(MalformedResponseError::InvalidTimestamp(*second))?;
            let last = daily.time[daily.time.len() - 1];
            (*first, interval, past_last(last, interval)?)
        }
    };

    Ok(RawSeriesResponse {
        start: timestamp(start)?,
        end: timestamp(end)?,
        interval_seconds: interval,
        values,
        unit_label: result.daily_units.remove(DAILY_MIN_VARIABLE),
        coordinates: LatLon(result.latitude, result.longitude),
        utc_offset_seconds: result.utc_offset_seconds,
    })
}
