//! Fragment catalogue loading.
//!
//! The catalogue is a CSV file with one row per tracked fragment, carrying
//! its Keplerian elements and ballistic properties in SI units (metres,
//! radians, kilograms).

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// One catalogue row.
#[derive(Debug, Clone, Deserialize)]
pub struct FragmentRecord {
    /// Parent-event name tag, e.g. the designation of the collision.
    #[serde(rename = "Name")]
    pub name: String,
    /// Equivalent diameter (m).
    pub d_eq: f64,
    /// Semi-major axis (m).
    pub a: f64,
    /// Eccentricity.
    pub e: f64,
    /// Inclination (rad).
    pub i: f64,
    /// Right ascension of the ascending node (rad).
    pub long_asc: f64,
    /// Argument of pericenter (rad).
    pub arg_peri: f64,
    /// Mean anomaly (rad).
    pub mean_anom: f64,
    /// Fragment mass (kg).
    #[serde(rename = "M")]
    pub mass: f64,
    /// Area-to-mass ratio (m²/kg).
    #[serde(rename = "A_M")]
    pub area_to_mass: f64,
}

/// Errors that can occur while loading a fragment catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalogue row: {0}")]
    Malformed(#[from] csv::Error),
}

/// Load every row of a fragment catalogue CSV.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<FragmentRecord>, CatalogError> {
    let reader = File::open(path)?;
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
