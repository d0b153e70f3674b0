//! Domain types for the stop server.
//!
//! This module contains the validated schedule data the rest of the crate
//! works with. Types enforce their invariants at construction time, so code
//! that receives them can trust their validity.

mod route;
mod schedule;
mod stop;
mod time;

pub use route::{Route, RouteId, RouteSortKey, compare_route_codes, sort_routes};
pub use schedule::{NormalizedArrival, ScheduleEntry};
pub use stop::{Coordinate, InvalidCoordinate, Stop, StopId};
pub use time::{InvalidReference, MalformedTime, ReferenceInstant, ScheduleTime, normalize};
