//! Schedule store error types.

use std::path::PathBuf;

/// Errors that can occur when loading or querying the schedule dataset.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required GTFS file is absent
    #[error("missing dataset file: {}", .0.display())]
    MissingFile(PathBuf),

    /// A CSV row could not be parsed
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    /// The background load task failed
    #[error("dataset load failed: {message}")]
    Load { message: String },
}
