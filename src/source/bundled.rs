//! Bundled (shipped) translation documents.

use std::collections::HashMap;
use std::io;
use std::path::{
    Component,
    Path,
    PathBuf,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::LocaleKey;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Bundled asset not found: {0}")]
    NotFound(String),

    #[error("Bundled asset path escapes the asset root: {0}")]
    InvalidPath(String),

    #[error("Failed to read bundled asset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read-only store of documents packaged with the application.
#[async_trait]
pub trait BundledAssetStore: Send + Sync {
    /// # Errors
    /// Returns an error when no asset exists at `path`.
    async fn read(&self, path: &str) -> Result<String, AssetError>;
}

/// Asset path for `key`: `<prefix>/<key>.json`.
#[must_use]
pub fn bundled_path(prefix: &str, key: &LocaleKey) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() { format!("{key}.json") } else { format!("{prefix}/{key}.json") }
}

/// Assets stored as files below a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirAssetStore {
    /// Directory asset paths are resolved against
    root: PathBuf,
}

impl DirAssetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BundledAssetStore for DirAssetStore {
    async fn read(&self, path: &str) -> Result<String, AssetError> {
        if !is_contained(Path::new(path)) {
            return Err(AssetError::InvalidPath(path.to_string()));
        }

        let full_path = self.root.join(path);
        tokio::fs::read_to_string(&full_path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AssetError::NotFound(path.to_string())
            } else {
                AssetError::Io { path: full_path, source }
            }
        })
    }
}

/// Whether `path` stays below the directory it is joined to.
fn is_contained(path: &Path) -> bool {
    path.components().all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Assets held in memory, typically populated with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    /// Asset path to content
    assets: HashMap<String, String>,
}

impl MemoryAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.assets.insert(path.into(), content.into());
        self
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for MemoryAssetStore {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self { assets: iter.into_iter().map(|(p, c)| (p.into(), c.into())).collect() }
    }
}

#[async_trait]
impl BundledAssetStore for MemoryAssetStore {
    async fn read(&self, path: &str) -> Result<String, AssetError> {
        self.assets.get(path).cloned().ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("assets/translations", "en", "assets/translations/en.json")]
    #[case("assets/translations/", "ar-SA", "assets/translations/ar-SA.json")]
    #[case("", "ja", "ja.json")]
    fn bundled_path_joins_prefix_and_key(
        #[case] prefix: &str,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        assert_that!(bundled_path(prefix, &LocaleKey::from(key)), eq(expected));
    }

    #[tokio::test]
    async fn dir_store_reads_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("assets/translations")).unwrap();
        fs::write(temp_dir.path().join("assets/translations/en.json"), r#"{"a":"b"}"#).unwrap();
        let store = DirAssetStore::new(temp_dir.path());

        let content = store.read("assets/translations/en.json").await.unwrap();

        assert_eq!(content, r#"{"a":"b"}"#);
    }

    #[tokio::test]
    async fn dir_store_missing_asset_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirAssetStore::new(temp_dir.path());

        let result = store.read("assets/translations/xx.json").await;

        assert!(matches!(result, Err(AssetError::NotFound(path)) if path == "assets/translations/xx.json"));
    }

    #[rstest]
    #[case("assets/translations/../../secret.json")]
    #[case("../outside.json")]
    #[case("/etc/passwd")]
    #[tokio::test]
    async fn dir_store_rejects_paths_outside_root(#[case] path: &str) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("root")).unwrap();
        fs::write(temp_dir.path().join("secret.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("outside.json"), "{}").unwrap();
        let store = DirAssetStore::new(temp_dir.path().join("root"));

        let result = store.read(path).await;

        assert!(matches!(result, Err(AssetError::InvalidPath(p)) if p == path));
    }

    #[tokio::test]
    async fn memory_store_from_pairs() {
        let store: MemoryAssetStore =
            [("t/en.json", r#"{"hello":"Hello"}"#), ("t/fr.json", r#"{"hello":"Bonjour"}"#)]
                .into_iter()
                .collect();

        assert_eq!(store.read("t/fr.json").await.unwrap(), r#"{"hello":"Bonjour"}"#);
        assert!(matches!(store.read("t/de.json").await, Err(AssetError::NotFound(_))));
    }
}
