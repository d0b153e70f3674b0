//! Stop and coordinate types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a latitude/longitude pair is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A point on the Earth's surface in decimal degrees.
///
/// Both components are finite and in range by construction.
///
/// # Examples
///
/// ```
/// use stop_server::domain::Coordinate;
///
/// let tallinn = Coordinate::new(59.437, 24.7536).unwrap();
/// assert_eq!(tallinn.lat(), 59.437);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Numeric stop identifier from the schedule dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    /// Public code shown on the stop sign, if the dataset has one
    pub code: Option<String>,
    pub name: String,
    /// District or locality the stop belongs to; empty when unknown
    pub area: String,
    pub location: Coordinate,
}
