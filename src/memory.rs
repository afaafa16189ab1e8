use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{Result, SourceError},
    source::FileSource,
    types::FileRecord,
};

/// In-memory file source
///
/// Holds its records directly and serves them on every listing. Useful as
/// a fixture backend in tests and demos: records can be swapped between
/// loads, failures can be injected, and the number of listings served is
/// counted.
pub struct MemorySource {
    label: String,
    records: RwLock<Vec<FileRecord>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_records(label, Vec::new())
    }

    /// Create a source pre-populated with records
    pub fn with_records(label: impl Into<String>, records: Vec<FileRecord>) -> Self {
        Self {
            label: label.into(),
            records: RwLock::new(records),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append one record
    pub async fn push(&self, record: FileRecord) {
        self.records.write().await.push(record);
    }

    /// Replace all records
    pub async fn replace(&self, records: Vec<FileRecord>) {
        *self.records.write().await = records;
    }

    /// Make subsequent listings fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `list_files` calls served so far, including failed ones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for MemorySource {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Backend {
                message: format!("injected failure in '{}'", self.label),
            });
        }
        Ok(self.records.read().await.clone())
    }

    fn describe(&self) -> String {
        format!("memory://{}", self.label)
    }
}
