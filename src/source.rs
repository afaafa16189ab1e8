use async_trait::async_trait;
use crate::{error::Result, types::FileRecord};

/// Core abstraction for file-listing backends
///
/// Implementors expose a read-only view of the files they hold
/// (local directories, remote listing APIs, in-memory fixtures, etc.).
/// Listing is idempotent and safe to invoke concurrently from
/// independent coordinators.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Produce the ordered list of files this source currently exposes
    ///
    /// Order is the backend's own; callers must not assume any re-sorting.
    async fn list_files(&self) -> Result<Vec<FileRecord>>;

    /// Get a human-readable label for this source (for logging/debugging)
    fn describe(&self) -> String;

    /// Check whether a file with the given name is present
    ///
    /// Default implementation lists and scans; backends with a cheaper
    /// membership check can override it.
    async fn contains(&self, name: &str) -> bool {
        match self.list_files().await {
            Ok(files) => files.iter().any(|f| f.name == name),
            Err(_) => false,
        }
    }
}
