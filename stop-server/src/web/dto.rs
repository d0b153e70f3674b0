//! Data transfer objects for web requests and responses.
//!
//! Field names match the JSON the existing browser frontend consumes.

use serde::{Deserialize, Serialize};

use crate::domain::{NormalizedArrival, Route, Stop};
use crate::geo::NearestStop;

/// Timestamp format for arrival times: the rider's local wall clock.
const ARRIVAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Query for stops in an area.
#[derive(Debug, Deserialize)]
pub struct StopsRequest {
    pub area: Option<String>,
}

/// Query for routes at a stop.
#[derive(Debug, Deserialize)]
pub struct BusesRequest {
    pub stop: Option<String>,
}

/// Query for the stop nearest a location.
#[derive(Debug, Deserialize)]
pub struct NearestStopRequest {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Query for upcoming arrivals.
#[derive(Debug, Deserialize)]
pub struct ArrivalTimesRequest {
    /// Stop ID
    pub stop: Option<String>,

    /// Route ID
    pub route: Option<String>,

    /// Client time as an RFC 3339 timestamp
    pub reference_date: Option<String>,

    /// Client time-zone offset in minutes, UTC minus local
    pub offset: Option<String>,
}

/// An area name.
#[derive(Debug, Serialize)]
pub struct AreaResult {
    pub area: String,
}

/// A stop in an area listing.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: u32,
    pub stop_name: String,
    pub stop_code: Option<String>,
}

/// A route calling at a stop.
#[derive(Debug, Serialize)]
pub struct BusResult {
    pub route_id: String,
    pub route_short_name: String,
}

/// The stop nearest a location.
#[derive(Debug, Serialize)]
pub struct NearestStopResult {
    pub stop_id: u32,
    pub stop_name: String,
    pub stop_area: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    /// Great-circle distance in kilometres
    pub distance: f64,
}

/// An upcoming arrival.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    pub trip_long_name: String,
    pub arrival_time: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&Stop> for StopResult {
    fn from(stop: &Stop) -> Self {
        Self {
            stop_id: stop.id.0,
            stop_name: stop.name.clone(),
            stop_code: stop.code.clone(),
        }
    }
}

impl From<Route> for BusResult {
    fn from(route: Route) -> Self {
        Self {
            route_id: route.id.0,
            route_short_name: route.short_name,
        }
    }
}

impl From<NearestStop<'_>> for NearestStopResult {
    fn from(nearest: NearestStop<'_>) -> Self {
        let stop = nearest.stop;
        Self {
            stop_id: stop.id.0,
            stop_name: stop.name.clone(),
            stop_area: stop.area.clone(),
            stop_lat: stop.location.lat(),
            stop_lon: stop.location.lon(),
            distance: nearest.distance_km,
        }
    }
}

impl From<NormalizedArrival> for ArrivalResult {
    fn from(arrival: NormalizedArrival) -> Self {
        Self {
            trip_long_name: arrival.trip_name,
            arrival_time: arrival.arrival.format(ARRIVAL_TIME_FORMAT).to_string(),
        }
    }
}
