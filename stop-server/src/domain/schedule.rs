//! Scheduled stop visits.

use chrono::NaiveDateTime;

use super::{RouteId, StopId};

/// One scheduled arrival of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub trip_id: String,
    /// Name shown to riders, e.g. "Viru - Kopli"
    pub trip_name: String,
    pub route_id: RouteId,
    pub stop_id: StopId,
    /// Raw "HH:MM:SS" from the dataset; hours may exceed 23
    pub arrival_time: String,
}

/// An arrival resolved to an absolute timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArrival {
    pub trip_name: String,
    pub arrival: NaiveDateTime,
}
