use polars::prelude::*;
use serde::Serialize;

/// One row of a [`ThresholdTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRow {
    /// Candidate threshold temperature.
    pub threshold: i32,
    /// Days whose minimum temperature was strictly below `threshold`.
    pub days_below: usize,
    /// `days_below / total days`, rounded half-to-even to 3 decimals.
    pub proportion_below: f64,
}

/// How many days fell below each threshold, most restrictive (highest) threshold first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    pub rows: Vec<ThresholdRow>,
    /// Number of days the proportions were computed over.
    pub total_days: usize,
}

impl ThresholdTable {
    pub fn thresholds(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|r| r.threshold)
    }

    pub fn row(&self, threshold: i32) -> Option<&ThresholdRow> {
        self.rows.iter().find(|r| r.threshold == threshold)
    }

    /// Converts the table into a Polars `DataFrame` with columns
    /// `temp`, `days_below` and `proportion_below`.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let temps: Vec<i32> = self.rows.iter().map(|r| r.threshold).collect();
        let days: Vec<u64> = self.rows.iter().map(|r| r.days_below as u64).collect();
        let proportions: Vec<f64> = self.rows.iter().map(|r| r.proportion_below).collect();
        DataFrame::new(vec![
            Column::new("temp".into(), temps),
            Column::new("days_below".into(), days),
            Column::new("proportion_below".into(), proportions),
        ])
    }
}
