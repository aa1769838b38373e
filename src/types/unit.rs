//! Defines the temperature unit requested from the archive and the
//! presentation defaults that go with each unit.

use crate::types::threshold_range::ThresholdRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature unit of the requested series.
///
/// The unit is sent upstream verbatim (see [`Unit::query_value`]), so the
/// archive performs the conversion and every value in the resulting
/// [`crate::TemperatureSeries`] is already expressed in this unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Degrees Fahrenheit.
    #[default]
    Fahrenheit,
    /// Degrees Celsius.
    Celsius,
}

impl Unit {
    /// The value of the `temperature_unit` query parameter.
    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            Unit::Fahrenheit => "fahrenheit",
            Unit::Celsius => "celsius",
        }
    }

    /// Display symbol, e.g. for an axis label.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Fahrenheit => "°F",
            Unit::Celsius => "°C",
        }
    }

    /// Plot threshold used when the caller does not pick one.
    ///
    /// # Examples
    ///
    /// ```
    /// use mintemp::Unit;
    ///
    /// assert_eq!(Unit::Fahrenheit.default_plot_threshold(), 5.0);
    /// assert_eq!(Unit::Celsius.default_plot_threshold(), -15.0);
    /// ```
    pub fn default_plot_threshold(&self) -> f64 {
        match self {
            Unit::Fahrenheit => 5.0,
            Unit::Celsius => -15.0,
        }
    }

    /// Threshold table range used when the caller does not pick one.
    pub fn default_table_range(&self) -> ThresholdRange {
        match self {
            Unit::Fahrenheit => ThresholdRange::new_unchecked(0, 15),
            Unit::Celsius => ThresholdRange::new_unchecked(-20, -10),
        }
    }
}

/// Formats a `Unit` as its query value.
///
/// # Examples
///
/// ```
/// use mintemp::Unit;
///
/// assert_eq!(Unit::Celsius.to_string(), "celsius");
/// ```
impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_value())
    }
}
