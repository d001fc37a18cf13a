//! Local translation cache.
//!
//! Entries are plain JSON text keyed by locale. The filesystem store keeps the
//! layout `<parent>/translations-res/<locale>.json`, where `<parent>` is the
//! OS temporary directory unless overridden. The environment may clear it at
//! any time, so every read tolerates a missing entry.

use std::collections::HashMap;
use std::io;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::LocaleKey;

/// Name of the cache directory inside the parent directory.
pub const CACHE_DIR_NAME: &str = "translations-res";

/// Suffix for temporary files written before the atomic rename.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("No cache entry for locale '{0}'")]
    Missing(LocaleKey),

    #[error("Locale '{0}' cannot be used as a cache file name")]
    InvalidKey(LocaleKey),

    #[error("Cache I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Key-value store for cached translation text with modification times.
#[async_trait]
pub trait LocalCacheStore: Send + Sync {
    async fn exists(&self, key: &LocaleKey) -> bool;

    /// # Errors
    /// Returns an error when the entry is gone or its metadata is unreadable.
    async fn last_modified(&self, key: &LocaleKey) -> Result<SystemTime, CacheError>;

    /// # Errors
    /// Returns an error when the entry is gone or unreadable.
    async fn read(&self, key: &LocaleKey) -> Result<String, CacheError>;

    /// Creates or replaces the entry, stamping it with the current time.
    ///
    /// # Errors
    /// Returns an error when the entry cannot be written.
    async fn write(&self, key: &LocaleKey, content: &str) -> Result<(), CacheError>;
}

/// Filesystem-backed cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsCacheStore {
    /// `<parent>/translations-res`
    root: PathBuf,
}

impl FsCacheStore {
    /// Cache rooted at `<parent>/translations-res`.
    #[must_use]
    pub fn under(parent: impl AsRef<Path>) -> Self {
        Self { root: parent.as_ref().join(CACHE_DIR_NAME) }
    }

    /// Cache rooted at `<os temp dir>/translations-res`.
    #[must_use]
    pub fn in_temp_dir() -> Self {
        Self::under(std::env::temp_dir())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `key`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidKey`] if the key would escape the cache
    /// directory.
    pub fn entry_path(&self, key: &LocaleKey) -> Result<PathBuf, CacheError> {
        let raw = key.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw == "." || raw == ".." {
            return Err(CacheError::InvalidKey(key.clone()));
        }
        Ok(self.root.join(format!("{raw}.json")))
    }

    /// Attaches `path` to an I/O error.
    fn io_error(path: &Path, source: io::Error) -> CacheError {
        CacheError::Io { path: path.to_path_buf(), source }
    }
}

#[async_trait]
impl LocalCacheStore for FsCacheStore {
    async fn exists(&self, key: &LocaleKey) -> bool {
        let Ok(path) = self.entry_path(key) else {
            return false;
        };
        tokio::fs::metadata(&path).await.is_ok_and(|meta| meta.is_file())
    }

    async fn last_modified(&self, key: &LocaleKey) -> Result<SystemTime, CacheError> {
        let path = self.entry_path(key)?;
        let meta = tokio::fs::metadata(&path).await.map_err(|e| Self::io_error(&path, e))?;
        meta.modified().map_err(|e| Self::io_error(&path, e))
    }

    async fn read(&self, key: &LocaleKey) -> Result<String, CacheError> {
        let path = self.entry_path(key)?;
        tokio::fs::read_to_string(&path).await.map_err(|e| Self::io_error(&path, e))
    }

    async fn write(&self, key: &LocaleKey, content: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| Self::io_error(&self.root, e))?;

        // Write to a sibling file and rename so readers never see a partial entry.
        let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_path =
            self.root.join(format!(".{key}.json.{}.{suffix}.tmp", std::process::id()));
        tokio::fs::write(&temp_path, content).await.map_err(|e| Self::io_error(&temp_path, e))?;
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Self::io_error(&path, e));
        }

        tracing::debug!(locale = %key, path = %path.display(), bytes = content.len(), "Cache entry written");
        Ok(())
    }
}

/// In-memory cache with explicit timestamps.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    /// Content and modification time per locale
    entries: RwLock<HashMap<LocaleKey, (String, SystemTime)>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry as if it had been written at `modified`.
    pub async fn insert_at(&self, key: LocaleKey, content: impl Into<String>, modified: SystemTime) {
        self.entries.write().await.insert(key, (content.into(), modified));
    }

    /// Content and timestamp of the entry for `key`.
    pub async fn entry(&self, key: &LocaleKey) -> Option<(String, SystemTime)> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl LocalCacheStore for MemoryCacheStore {
    async fn exists(&self, key: &LocaleKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    async fn last_modified(&self, key: &LocaleKey) -> Result<SystemTime, CacheError> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|(_, modified)| *modified)
            .ok_or_else(|| CacheError::Missing(key.clone()))
    }

    async fn read(&self, key: &LocaleKey) -> Result<String, CacheError> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|(content, _)| content.clone())
            .ok_or_else(|| CacheError::Missing(key.clone()))
    }

    async fn write(&self, key: &LocaleKey, content: &str) -> Result<(), CacheError> {
        self.insert_at(key.clone(), content, SystemTime::now()).await;
        Ok(())
    }
}
