use crate::aggregation::error::AggregationError;
use crate::types::series::TemperatureSeries;
use crate::types::threshold_range::ThresholdRange;
use crate::types::threshold_table::{ThresholdRow, ThresholdTable};

const PROPORTION_SCALE: u128 = 1_000;

/// Counts, for every integer threshold in `range` (highest first), the days whose
/// minimum temperature was strictly below it.
///
/// Proportions divide by the full series length, missing days included; a missing
/// day never counts as below. They are rounded to 3 decimals half-to-even on the
/// exact ratio, so 0.0025 becomes 0.002 and 0.0035 becomes 0.004.
///
/// # Errors
///
/// Returns [`AggregationError::InsufficientData`] if `series` is empty.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use mintemp::{threshold_table, TemperatureSeries, ThresholdRange};
///
/// let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let series = TemperatureSeries::daily(start, [5.0, 3.0, 8.0, 1.0, 9.0].map(Some));
/// let table = threshold_table(&series, ThresholdRange::new(2, 6).unwrap()).unwrap();
///
/// assert_eq!(table.thresholds().collect::<Vec<_>>(), vec![6, 5, 4, 3, 2]);
/// let proportions: Vec<f64> = table.rows.iter().map(|r| r.proportion_below).collect();
/// assert_eq!(proportions, vec![0.6, 0.4, 0.2, 0.2, 0.2]);
/// ```
pub fn threshold_table(
    series: &TemperatureSeries,
    range: ThresholdRange,
) -> Result<ThresholdTable, AggregationError> {
    if series.is_empty() {
        return Err(AggregationError::InsufficientData);
    }

    let total = series.len();
    let mut present: Vec<f64> = series.values().flatten().collect();
    present.sort_by(f64::total_cmp);

    let rows = range
        .thresholds()
        .map(|threshold| {
            let limit = f64::from(threshold);
            let days_below = present.partition_point(|v| *v < limit);
            ThresholdRow {
                threshold,
                days_below,
                proportion_below: round_proportion(days_below, total),
            }
        })
        .collect();

    Ok(ThresholdTable {
        rows,
        total_days: total,
    })
}

/// `count / total` rounded half-to-even to 3 decimals, computed on integers.
pub(crate) fn round_proportion(count: usize, total: usize) -> f64 {
    let scaled = count as u128 * PROPORTION_SCALE;
    let total = total as u128;
    let mut quotient = scaled / total;
    let twice_remainder = 2 * (scaled % total);

    if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient += 1;
    }
    quotient as f64 / PROPORTION_SCALE as f64
}
