//! Arrival selection configuration.

/// Default number of upcoming arrivals returned per route and stop.
pub const DEFAULT_ARRIVAL_LIMIT: usize = 5;

/// Configuration parameters for arrival selection.
#[derive(Debug, Clone)]
pub struct ArrivalConfig {
    /// Maximum number of arrivals to return.
    /// Next-day arrivals are also pulled in when fewer than this remain today.
    pub limit: usize,
}

impl ArrivalConfig {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ARRIVAL_LIMIT,
        }
    }
}
