//! Geographic reference data: coordinates and named locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are in decimal degrees.
///
/// # Examples
///
/// ```
/// use mintemp::LatLon;
///
/// let urbana = LatLon(40.1106, -88.2073);
/// assert_eq!(urbana.0, 40.1106); // Latitude
/// assert_eq!(urbana.1, -88.2073); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// Formats as the dashboard's coordinate label, e.g. `40.1106°N, -88.2073°E`.
impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{b0}N, {}\u{b0}E", self.0, self.1)
    }
}

/// A named place the archive can be queried for.
///
/// Names follow the `"<city>, <state>"` convention of the reference table and
/// are unique within a [`crate::LocationTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name, e.g. `"Urbana, Illinois"`.
    pub name: String,
    pub coordinates: LatLon,
}

impl Location {
    pub fn new(name: impl Into<String>, coordinates: LatLon) -> Self {
        Self {
            name: name.into(),
            coordinates,
        }
    }
}

impl From<LatLon> for Location {
    /// An unnamed location; the coordinate label doubles as its name.
    fn from(coordinates: LatLon) -> Self {
        Self {
            name: coordinates.to_string(),
            coordinates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_label() {
        let label = LatLon(40.1106, -88.2073).to_string();
        assert_eq!(label, "40.1106°N, -88.2073°E");
    }

    #[test]
    fn test_location_from_coordinates() {
        let location = Location::from(LatLon(1.5, 2.0));
        assert_eq!(location.name, "1.5°N, 2°E");
        assert_eq!(location.coordinates.latitude(), 1.5);
    }
}
