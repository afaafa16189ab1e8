use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::{
    error::{Result, SourceError},
    source::FileSource,
    types::FileRecord,
};

/// Cache interface for storing serialized listings
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a cached listing by key
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store a listing in the cache
    async fn set(&self, key: &str, value: Bytes) -> Result<()>;

    /// Check if a key exists in the cache
    async fn contains(&self, key: &str) -> bool;

    /// Remove a key from the cache
    async fn remove(&self, key: &str) -> Result<()>;

    /// Clear all cached listings
    async fn clear(&self) -> Result<()>;
}

/// In-memory cache implementation
pub struct MemoryCache {
    store: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), value);
        Ok(())
    }

    async fn contains(&self, key: &str) -> bool {
        let store = self.store.read().await;
        store.contains_key(key)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }
}

/// Disk-based cache implementation
pub struct DiskCache {
    root_dir: PathBuf,
}

impl DiskCache {
    /// Create a new disk cache at the specified directory
    pub async fn new(root_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root_dir).await?;
        Ok(Self { root_dir })
    }

    /// Convert a cache key to a safe file path
    fn key_to_path(&self, key: &str) -> PathBuf {
        // Use SHA-256 hash to create a safe filename
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        let hash_str = format!("{:x}", hash);

        self.root_dir.join(&hash_str[..2]).join(&hash_str[2..])
    }
}

#[async_trait]
impl Cache for DiskCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let path = self.key_to_path(key);

        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SourceError::Cache {
                message: format!("failed to read from disk cache: {}", e),
            }),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        let path = self.key_to_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, &value).await.map_err(|e| SourceError::Cache {
            message: format!("failed to write to disk cache: {}", e),
        })
    }

    async fn contains(&self, key: &str) -> bool {
        let path = self.key_to_path(key);
        path.exists()
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_to_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SourceError::Cache {
                message: format!("failed to remove from disk cache: {}", e),
            }),
        }
    }

    async fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.root_dir).await?;
        fs::create_dir_all(&self.root_dir).await?;
        Ok(())
    }
}

/// No-op cache that doesn't cache anything
pub struct NoCache;

#[async_trait]
impl Cache for NoCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Bytes) -> Result<()> {
        Ok(())
    }

    async fn contains(&self, _key: &str) -> bool {
        false
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Source decorator that falls back to the last successful listing
///
/// On success the listing is serialized into the cache; when the wrapped
/// backend fails, the cached listing is served instead of the error. The
/// error still propagates when nothing usable is cached.
pub struct CachedSource {
    inner: Arc<dyn FileSource>,
    cache: Arc<dyn Cache>,
    key: String,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn FileSource>, cache: Arc<dyn Cache>) -> Self {
        let key = format!("listing:{}", inner.describe());
        Self { inner, cache, key }
    }

    async fn cached_listing(&self) -> Option<Vec<FileRecord>> {
        let bytes = self.cache.get(&self.key).await.ok().flatten()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[async_trait]
impl FileSource for CachedSource {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        match self.inner.list_files().await {
            Ok(files) => {
                if let Ok(encoded) = serde_json::to_vec(&files) {
                    let _ = self.cache.set(&self.key, Bytes::from(encoded)).await;
                }
                Ok(files)
            }
            Err(err) => match self.cached_listing().await {
                Some(files) => {
                    tracing::warn!(
                        source = %self.inner.describe(),
                        error = %err,
                        "backend failed, serving cached listing"
                    );
                    Ok(files)
                }
                None => Err(err),
            },
        }
    }

    fn describe(&self) -> String {
        format!("cached:{}", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;

    #[tokio::test]
    async fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        let key = "listing:memory://fixtures";
        let value = Bytes::from(r#"[{"name":"a.txt"}]"#);

        assert!(!cache.contains(key).await);
        assert!(cache.get(key).await.unwrap().is_none());

        cache.set(key, value.clone()).await.unwrap();
        assert!(cache.contains(key).await);
        assert_eq!(cache.get(key).await.unwrap().unwrap(), value);

        cache.remove(key).await.unwrap();
        assert!(!cache.contains(key).await);
    }

    #[tokio::test]
    async fn cached_source_serves_last_listing_on_failure() {
        let backend = Arc::new(MemorySource::with_records(
            "flaky",
            vec![FileRecord::new("a.txt"), FileRecord::new("b.txt")],
        ));
        let source = CachedSource::new(backend.clone(), Arc::new(MemoryCache::new()));

        // Successful listing populates the cache.
        let live = source.list_files().await.unwrap();
        assert_eq!(live.len(), 2);

        backend.set_failing(true);
        let fallback = source.list_files().await.unwrap();
        assert_eq!(fallback, live);
    }

    #[tokio::test]
    async fn cached_source_propagates_failure_when_cache_is_cold() {
        let backend = Arc::new(MemorySource::new("flaky"));
        backend.set_failing(true);
        let source = CachedSource::new(backend, Arc::new(MemoryCache::new()));

        assert!(source.list_files().await.is_err());
    }

    #[tokio::test]
    async fn no_cache_never_stores() {
        let cache = NoCache;
        cache.set("key", Bytes::from("value")).await.unwrap();
        assert!(!cache.contains("key").await);
        assert!(cache.get("key").await.unwrap().is_none());
    }
}
