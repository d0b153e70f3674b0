//! Read-only access to the schedule dataset.
//!
//! The pure query logic never touches storage; request handlers fetch rows
//! through [`ScheduleStore`] and hand plain values to it.

mod error;
mod gtfs;
mod handle;

pub use error::StoreError;
pub use gtfs::GtfsDataset;
pub use handle::DatasetHandle;

use crate::domain::{Route, RouteId, ScheduleEntry, Stop, StopId};

/// Lookups the request handlers need from a schedule dataset.
pub trait ScheduleStore {
    /// Stops in an area, ordered by name.
    fn fetch_stops_in_area(&self, area: &str) -> Result<Vec<Stop>, StoreError>;

    /// Distinct non-empty area names, ascending.
    fn fetch_all_areas(&self) -> Result<Vec<String>, StoreError>;

    /// Distinct routes calling at a stop, in no particular order.
    fn fetch_routes_for_stop(&self, stop_id: StopId) -> Result<Vec<Route>, StoreError>;

    /// Scheduled arrivals of a route at a stop, ascending by raw arrival time.
    fn fetch_schedule_entries(
        &self,
        route_id: &RouteId,
        stop_id: StopId,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Every stop with usable coordinates.
    fn fetch_all_stops(&self) -> Result<Vec<Stop>, StoreError>;
}
