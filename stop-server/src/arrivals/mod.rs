//! Upcoming arrivals for a route at a stop.
//!
//! Schedule rows carry service-day times that can run past 24:00. This
//! module resolves them against the rider's reference instant and picks the
//! next few, spilling over into tomorrow's timetable late in the evening.

mod config;
mod select;

pub use config::{ArrivalConfig, DEFAULT_ARRIVAL_LIMIT};
pub use select::select_arrivals;
