//! Reference table of named locations, loaded from CSV.
//!
//! Two layouts are understood. The prepared layout has one row per location with
//! the columns `city_state`, `lat` and `lng`. The raw layout is a full city
//! dataset with `city`, `state_name`, `lat`, `lng` and `population`, which
//! [`LocationTable::from_raw_csv`] filters and names.

use crate::error::MinTempError;
use crate::locations::error::LocationError;
use crate::types::location::{LatLon, Location};
use log::{debug, info};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::task;

const NAME_COLUMN: &str = "city_state";
const LAT_COLUMN: &str = "lat";
const LNG_COLUMN: &str = "lng";
const CITY_COLUMN: &str = "city";
const STATE_COLUMN: &str = "state_name";
const POPULATION_COLUMN: &str = "population";

/// Smallest population for a city to be listed.
pub const MIN_POPULATION: f64 = 10_000.0;

/// Immutable mapping from display name to [`Location`], ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    locations: BTreeMap<String, Location>,
}

impl LocationTable {
    /// Builds a table from locations; the last location with a given name wins.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let mut table = BTreeMap::new();
        for location in locations {
            if let Some(previous) = table.insert(location.name.clone(), location) {
                debug!("Duplicate location '{}' replaced", previous.name);
            }
        }
        Self { locations: table }
    }

    /// Reads a prepared CSV with the columns `city_state`, `lat` and `lng`.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] if the file cannot be parsed, a column is missing
    /// or a row lacks a value.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, LocationError> {
        let path = path.as_ref();
        let df = read_csv(path)?;

        let names = string_values(&df, path, NAME_COLUMN)?;
        let coordinates = coordinate_values(&df, path)?;

        let locations = names
            .into_iter()
            .zip(coordinates)
            .enumerate()
            .map(|(row, (name, coordinates))| {
                let name = name.ok_or_else(|| missing_value(path, row, NAME_COLUMN))?;
                Ok(Location::new(name, coordinates?))
            })
            .collect::<Result<Vec<_>, LocationError>>()?;

        let table = Self::from_locations(locations);
        info!("Loaded {} locations from {:?}", table.len(), path);
        Ok(table)
    }

    /// Reads the raw city dataset, keeping cities with a population of at least
    /// [`MIN_POPULATION`] and naming them `"<city>, <state_name>"`.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] if the file cannot be parsed, a column is missing
    /// or a kept row lacks a value.
    pub fn from_raw_csv(path: impl AsRef<Path>) -> Result<Self, LocationError> {
        let path = path.as_ref();
        let raw = read_csv(path)?;
        let total = raw.height();

        let df = raw
            .lazy()
            .filter(
                col(POPULATION_COLUMN)
                    .cast(DataType::Float64)
                    .gt_eq(lit(MIN_POPULATION)),
            )
            .collect()
            .map_err(|source| LocationError::MissingColumn {
                path: path.to_path_buf(),
                column: POPULATION_COLUMN.to_string(),
                source,
            })?;

        let cities = string_values(&df, path, CITY_COLUMN)?;
        let states = string_values(&df, path, STATE_COLUMN)?;
        let coordinates = coordinate_values(&df, path)?;

        let locations = cities
            .into_iter()
            .zip(states)
            .zip(coordinates)
            .enumerate()
            .map(|(row, ((city, state), coordinates))| {
                let city = city.ok_or_else(|| missing_value(path, row, CITY_COLUMN))?;
                let state = state.ok_or_else(|| missing_value(path, row, STATE_COLUMN))?;
                Ok(Location::new(format!("{city}, {state}"), coordinates?))
            })
            .collect::<Result<Vec<_>, LocationError>>()?;

        let table = Self::from_locations(locations);
        info!(
            "Prepared {} locations from {} rows of {:?}",
            table.len(),
            total,
            path
        );
        Ok(table)
    }

    /// [`LocationTable::from_csv`] on a blocking task.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, LocationError> {
        let path = path.into();
        task::spawn_blocking(move || Self::from_csv(&path)).await?
    }

    /// [`LocationTable::from_raw_csv`] on a blocking task.
    pub async fn load_raw(path: impl Into<PathBuf>) -> Result<Self, LocationError> {
        let path = path.into();
        task::spawn_blocking(move || Self::from_raw_csv(&path)).await?
    }

    /// Writes the table in the prepared layout read by [`LocationTable::from_csv`].
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] if the file cannot be created or encoded.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), LocationError> {
        let path = path.as_ref();
        let mut df = self
            .to_frame()
            .map_err(|e| LocationError::CsvWritePolars(path.to_path_buf(), e))?;
        let mut file = std::fs::File::create(path)
            .map_err(|e| LocationError::CsvWriteIo(path.to_path_buf(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| LocationError::CsvWritePolars(path.to_path_buf(), e))?;
        info!("Wrote {} locations to {:?}", self.len(), path);
        Ok(())
    }

    /// The table in the prepared layout: `city_state`, `lat`, `lng`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = self.locations.keys().map(String::as_str).collect();
        let lats: Vec<f64> = self.iter().map(|l| l.coordinates.latitude()).collect();
        let lngs: Vec<f64> = self.iter().map(|l| l.coordinates.longitude()).collect();
        DataFrame::new(vec![
            Column::new(NAME_COLUMN.into(), names),
            Column::new(LAT_COLUMN.into(), lats),
            Column::new(LNG_COLUMN.into(), lngs),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Looks up `name`, failing with [`MinTempError::UnknownLocation`] if absent.
    pub fn require(&self, name: &str) -> Result<&Location, MinTempError> {
        self.get(name)
            .ok_or_else(|| MinTempError::UnknownLocation(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, LocationError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| LocationError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| LocationError::CsvRead(path.to_path_buf(), e))
}

fn missing_value(path: &Path, row: usize, column: &str) -> LocationError {
    LocationError::MissingValue {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
    }
}

fn typed_column(
    df: &DataFrame,
    path: &Path,
    name: &str,
    dtype: &DataType,
) -> Result<Column, LocationError> {
    let missing = |source: PolarsError| LocationError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
        source,
    };
    df.column(name).map_err(missing)?.cast(dtype).map_err(missing)
}

fn string_values(
    df: &DataFrame,
    path: &Path,
    name: &str,
) -> Result<Vec<Option<String>>, LocationError> {
    let column = typed_column(df, path, name, &DataType::String)?;
    let values = column.str().map_err(|source| LocationError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
        source,
    })?;
    Ok(values
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn float_values(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<f64>>, LocationError> {
    let column = typed_column(df, path, name, &DataType::Float64)?;
    let values = column.f64().map_err(|source| LocationError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
        source,
    })?;
    Ok(values.into_iter().collect())
}

/// One entry per row; a row without a latitude or longitude is an error.
fn coordinate_values(
    df: &DataFrame,
    path: &Path,
) -> Result<Vec<Result<LatLon, LocationError>>, LocationError> {
    let lats = float_values(df, path, LAT_COLUMN)?;
    let lngs = float_values(df, path, LNG_COLUMN)?;
    Ok(lats
        .into_iter()
        .zip(lngs)
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(lat), Some(lng)) => Ok(LatLon(lat, lng)),
            (None, _) => Err(missing_value(path, row, LAT_COLUMN)),
            (_, None) => Err(missing_value(path, row, LNG_COLUMN)),
        })
        .collect())
}
