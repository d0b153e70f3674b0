//! Bus stop arrivals server.
//!
//! A web service that answers three rider questions against a static
//! schedule: which stop is nearest, which routes call there, and when the
//! next buses on a route arrive.

pub mod arrivals;
pub mod config;
pub mod domain;
pub mod geo;
pub mod store;
pub mod web;
