//! Web layer for the stop server.
//!
//! Provides the JSON endpoints the rider-facing frontend calls: stop areas,
//! stops, routes at a stop, the nearest stop and upcoming arrivals.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
