//! Application state for the web layer.

use std::sync::Arc;

use crate::arrivals::ArrivalConfig;
use crate::store::DatasetHandle;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Lazily loaded schedule dataset
    pub dataset: Arc<DatasetHandle>,

    /// Arrival selection configuration
    pub arrivals: Arc<ArrivalConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(dataset: DatasetHandle, arrivals: ArrivalConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            arrivals: Arc::new(arrivals),
        }
    }
}
