//! In-memory schedule dataset loaded from GTFS text files.
//!
//! Reads `stops.txt`, `routes.txt`, `trips.txt` and `stop_times.txt`. Besides
//! the standard columns, the optional `stop_area` (stops) and
//! `trip_long_name` (trips) extensions used by Estonian feeds are picked up
//! when present.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Route, RouteId, ScheduleEntry, ScheduleTime, Stop, StopId};

use super::ScheduleStore;
use super::error::StoreError;

const STOPS_FILE: &str = "stops.txt";
const ROUTES_FILE: &str = "routes.txt";
const TRIPS_FILE: &str = "trips.txt";
const STOP_TIMES_FILE: &str = "stop_times.txt";

#[derive(Debug, Deserialize)]
struct StopRecord {
    stop_id: u32,
    #[serde(default)]
    stop_code: Option<String>,
    stop_name: String,
    #[serde(default)]
    stop_lat: Option<f64>,
    #[serde(default)]
    stop_lon: Option<f64>,
    #[serde(default)]
    stop_area: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    route_id: String,
    #[serde(default)]
    route_short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TripRecord {
    trip_id: String,
    route_id: String,
    #[serde(default)]
    trip_long_name: Option<String>,
    #[serde(default)]
    trip_headsign: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StopTimeRecord {
    trip_id: String,
    #[serde(default)]
    arrival_time: Option<String>,
    stop_id: u32,
}

/// A read-only schedule snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct GtfsDataset {
    /// Stops in file order.
    stops: Vec<Stop>,
    routes: HashMap<RouteId, Route>,
    /// Schedule entries per stop, ascending by raw arrival time.
    entries_by_stop: HashMap<StopId, Vec<ScheduleEntry>>,
    /// Distinct routes calling at each stop, in first-seen order.
    routes_by_stop: HashMap<StopId, Vec<RouteId>>,
}

impl GtfsDataset {
    /// Load a dataset from a directory of GTFS text files.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let stops = read_records::<StopRecord>(dir, STOPS_FILE)?
            .into_iter()
            .filter_map(stop_from_record)
            .collect();

        let routes = read_records::<RouteRecord>(dir, ROUTES_FILE)?
            .into_iter()
            .map(|r| Route {
                short_name: r.route_short_name.unwrap_or_default(),
                id: RouteId(r.route_id),
            })
            .collect();

        let trips: HashMap<String, TripRecord> = read_records::<TripRecord>(dir, TRIPS_FILE)?
            .into_iter()
            .map(|t| (t.trip_id.clone(), t))
            .collect();

        let mut unknown_trips = 0usize;
        let mut untimed = 0usize;
        let entries = read_records::<StopTimeRecord>(dir, STOP_TIMES_FILE)?
            .into_iter()
            .filter_map(|st| {
                let Some(trip) = trips.get(&st.trip_id) else {
                    unknown_trips += 1;
                    return None;
                };
                let Some(arrival_time) = st.arrival_time else {
                    untimed += 1;
                    return None;
                };
                Some(ScheduleEntry {
                    trip_name: trip_display_name(trip),
                    route_id: RouteId(trip.route_id.clone()),
                    stop_id: StopId(st.stop_id),
                    arrival_time,
                    trip_id: st.trip_id,
                })
            })
            .collect();

        if unknown_trips > 0 {
            warn!(count = unknown_trips, "skipped stop times for unknown trips");
        }
        if untimed > 0 {
            debug!(count = untimed, "skipped stop times without an arrival time");
        }

        Ok(Self::from_records(stops, routes, entries))
    }

    /// Build a dataset from already-validated records.
    pub fn from_records(stops: Vec<Stop>, routes: Vec<Route>, entries: Vec<ScheduleEntry>) -> Self {
        let routes: HashMap<RouteId, Route> =
            routes.into_iter().map(|r| (r.id.clone(), r)).collect();

        let mut entries_by_stop: HashMap<StopId, Vec<ScheduleEntry>> = HashMap::new();
        let mut routes_by_stop: HashMap<StopId, Vec<RouteId>> = HashMap::new();
        let mut seen: HashSet<(StopId, RouteId)> = HashSet::new();

        for entry in entries {
            if routes.contains_key(&entry.route_id)
                && seen.insert((entry.stop_id, entry.route_id.clone()))
            {
                routes_by_stop
                    .entry(entry.stop_id)
                    .or_default()
                    .push(entry.route_id.clone());
            }
            entries_by_stop.entry(entry.stop_id).or_default().push(entry);
        }

        // Chronological order; feeds may leave single-digit hours unpadded.
        // Unparseable times sort first and fail later in selection.
        for list in entries_by_stop.values_mut() {
            list.sort_by_cached_key(|e| {
                (
                    ScheduleTime::parse(&e.arrival_time).ok(),
                    e.arrival_time.clone(),
                )
            });
        }

        Self {
            stops,
            routes,
            entries_by_stop,
            routes_by_stop,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries_by_stop.values().map(Vec::len).sum()
    }
}

impl ScheduleStore for GtfsDataset {
    fn fetch_stops_in_area(&self, area: &str) -> Result<Vec<Stop>, StoreError> {
        let mut stops: Vec<Stop> = self
            .stops
            .iter()
            .filter(|s| s.area == area)
            .cloned()
            .collect();
        stops.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stops)
    }

    fn fetch_all_areas(&self) -> Result<Vec<String>, StoreError> {
        let areas: BTreeSet<&str> = self
            .stops
            .iter()
            .map(|s| s.area.as_str())
            .filter(|a| !a.is_empty())
            .collect();
        Ok(areas.into_iter().map(str::to_string).collect())
    }

    fn fetch_routes_for_stop(&self, stop_id: StopId) -> Result<Vec<Route>, StoreError> {
        let routes = self
            .routes_by_stop
            .get(&stop_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.routes.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(routes)
    }

    fn fetch_schedule_entries(
        &self,
        route_id: &RouteId,
        stop_id: StopId,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let entries = self
            .entries_by_stop
            .get(&stop_id)
            .map(|list| {
                list.iter()
                    .filter(|e| &e.route_id == route_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(entries)
    }

    fn fetch_all_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.stops.clone())
    }
}

fn read_records<T: DeserializeOwned>(dir: &Path, file: &'static str) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(StoreError::MissingFile(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|source| StoreError::Csv { file, source })?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StoreError::Csv { file, source })
}

/// Stops without usable coordinates can't take part in distance ranking.
fn stop_from_record(record: StopRecord) -> Option<Stop> {
    let (Some(lat), Some(lon)) = (record.stop_lat, record.stop_lon) else {
        warn!(stop_id = record.stop_id, "skipping stop without coordinates");
        return None;
    };
    let location = match Coordinate::new(lat, lon) {
        Ok(location) => location,
        Err(e) => {
            warn!(stop_id = record.stop_id, error = %e, "skipping stop");
            return None;
        }
    };

    Some(Stop {
        id: StopId(record.stop_id),
        code: record.stop_code.filter(|c| !c.is_empty()),
        name: record.stop_name,
        area: record.stop_area.unwrap_or_default(),
        location,
    })
}

/// Prefer the long name, then the headsign, then the raw trip ID.
fn trip_display_name(trip: &TripRecord) -> String {
    trip.trip_long_name
        .as_deref()
        .or(trip.trip_headsign.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or(&trip.trip_id)
        .to_string()
}
