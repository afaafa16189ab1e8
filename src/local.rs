use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::fs;

use crate::{error::Result, source::FileSource, types::FileRecord};

/// File source backed by one local directory
///
/// Lists the regular files directly inside the directory; subdirectories
/// are not descended into. Entries are sorted by name because `read_dir`
/// order is platform-dependent and the listing contract is an ordered
/// sequence.
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileSource for LocalDirSource {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut records = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let mut record = FileRecord::new(entry.file_name().to_string_lossy().into_owned())
                .with_size(metadata.len());
            if let Ok(modified) = metadata.modified() {
                if let Ok(since_epoch) = modified.duration_since(UNIX_EPOCH) {
                    record = record.with_metadata("modified", since_epoch.as_secs());
                }
            }
            records.push(record);
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("local://{}", self.root.display())
    }
}
