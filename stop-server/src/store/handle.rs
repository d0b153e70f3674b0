//! Lazily loaded, shared dataset handle.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use super::error::StoreError;
use super::gtfs::GtfsDataset;

/// Owns the schedule dataset for the lifetime of the server.
///
/// The dataset is read from disk on first use. A failed load is not
/// remembered, so the next caller tries again.
#[derive(Debug)]
pub struct DatasetHandle {
    dir: PathBuf,
    dataset: OnceCell<Arc<GtfsDataset>>,
}

impl DatasetHandle {
    /// Create a handle that will load from `dir` on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dataset: OnceCell::new(),
        }
    }

    /// Create a handle around an already-built dataset.
    pub fn preloaded(dataset: GtfsDataset) -> Self {
        Self {
            dir: PathBuf::new(),
            dataset: OnceCell::new_with(Some(Arc::new(dataset))),
        }
    }

    /// Whether the dataset has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.dataset.initialized()
    }

    /// Get the dataset, loading it if needed.
    ///
    /// Concurrent callers wait on a single load.
    pub async fn get(&self) -> Result<Arc<GtfsDataset>, StoreError> {
        self.dataset
            .get_or_try_init(|| async {
                let dir = self.dir.clone();
                info!(dir = %dir.display(), "loading schedule dataset");

                let dataset = tokio::task::spawn_blocking(move || GtfsDataset::load(&dir))
                    .await
                    .map_err(|e| StoreError::Load {
                        message: e.to_string(),
                    })??;

                info!(
                    stops = dataset.stop_count(),
                    routes = dataset.route_count(),
                    stop_times = dataset.entry_count(),
                    "schedule dataset loaded"
                );
                Ok::<_, StoreError>(Arc::new(dataset))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_feed(dir: &Path) {
        fs::write(
            dir.join("stops.txt"),
            "stop_id,stop_name,stop_lat,stop_lon\n1,Viru,59.437,24.7536\n",
        )
        .unwrap();
        fs::write(dir.join("routes.txt"), "route_id,route_short_name\nr,5\n").unwrap();
        fs::write(dir.join("trips.txt"), "route_id,trip_id\nr,t\n").unwrap();
        fs::write(
            dir.join("stop_times.txt"),
            "trip_id,arrival_time,stop_id\nt,12:00:00,1\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn loads_on_first_use() {
        let dir = tempdir().unwrap();
        write_feed(dir.path());

        let handle = DatasetHandle::new(dir.path());
        assert!(!handle.is_loaded());

        let dataset = handle.get().await.unwrap();
        assert_eq!(dataset.stop_count(), 1);
        assert!(handle.is_loaded());

        // Second call returns the same snapshot
        let again = handle.get().await.unwrap();
        assert!(Arc::ptr_eq(&dataset, &again));
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let dir = tempdir().unwrap();
        let handle = DatasetHandle::new(dir.path());

        assert!(matches!(
            handle.get().await,
            Err(StoreError::MissingFile(_))
        ));
        assert!(!handle.is_loaded());

        write_feed(dir.path());
        assert!(handle.get().await.is_ok());
    }

    #[tokio::test]
    async fn preloaded_skips_disk() {
        let handle = DatasetHandle::preloaded(GtfsDataset::default());
        assert!(handle.is_loaded());
        assert_eq!(handle.get().await.unwrap().stop_count(), 0);
    }
}
