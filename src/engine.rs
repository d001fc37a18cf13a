//! Four-tier translation resolution.
//!
//! For a locale the engine tries, in order:
//!
//! 1. a cache entry no older than the freshness window,
//! 2. the remote source (only when connectivity reports reachable), raced
//!    against the request timeout and written through to the cache,
//! 3. a cache entry of any age,
//! 4. the bundled document.
//!
//! The first tier that yields a valid JSON object wins. Failures in tiers 1-3
//! are logged and skipped; only a failure of the bundled tier is returned.

use std::sync::Arc;
use std::time::{
    Duration,
    SystemTime,
};

use async_trait::async_trait;

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::source::{
    BundledAssetStore,
    ConnectivityOracle,
    LocalCacheStore,
    RemoteFetcher,
    bundled_path,
};
use crate::types::{
    LocaleKey,
    Resolution,
    Tier,
    TranslationDocument,
    parse_document,
};

/// Loader contract shared with host localization frameworks.
///
/// `path` exists for compatibility with loaders that read from an asset
/// directory; implementations may ignore it.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// # Errors
    /// Returns an error when no document can be produced for `locale`.
    async fn load(
        &self,
        path: &str,
        locale: &LocaleKey,
    ) -> Result<TranslationDocument, ResolveError>;
}

/// Resolves translation documents through cache, network and bundled tiers.
pub struct ResolutionEngine {
    /// Fixed at construction
    config: ResolverConfig,
    /// Consulted before every remote fetch
    connectivity: Arc<dyn ConnectivityOracle>,
    /// Remote source (tier 2)
    fetcher: Arc<dyn RemoteFetcher>,
    /// Fresh and stale cache (tiers 1 and 3), written through by tier 2
    cache: Arc<dyn LocalCacheStore>,
    /// Last-resort documents (tier 4)
    bundled: Arc<dyn BundledAssetStore>,
}

impl ResolutionEngine {
    #[must_use]
    pub fn new(
        config: ResolverConfig,
        connectivity: Arc<dyn ConnectivityOracle>,
        fetcher: Arc<dyn RemoteFetcher>,
        cache: Arc<dyn LocalCacheStore>,
        bundled: Arc<dyn BundledAssetStore>,
    ) -> Self {
        Self { config, connectivity, fetcher, cache, bundled }
    }

    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the document for `key`.
    ///
    /// # Errors
    /// See [`ResolutionEngine::resolve`].
    pub async fn load(&self, key: &LocaleKey) -> Result<TranslationDocument, ResolveError> {
        self.resolve(key).await.map(|resolution| resolution.document)
    }

    /// Returns the document for `key` together with the tier that served it.
    ///
    /// # Errors
    /// - [`ResolveError::UnsupportedLocale`] when a supported set is configured
    ///   and `key` is not in it
    /// - [`ResolveError::BundledUnavailable`] / [`ResolveError::BundledInvalid`]
    ///   when every other tier came up empty and the bundled document is
    ///   missing or corrupt
    pub async fn resolve(&self, key: &LocaleKey) -> Result<Resolution, ResolveError> {
        if !self.config.is_supported(key) {
            return Err(ResolveError::UnsupportedLocale(key.clone()));
        }

        let (document, tier) = if let Some(document) = self.fresh_cached(key).await {
            (document, Tier::FreshCache)
        } else if let Some(document) = self.fetch_remote(key).await {
            (document, Tier::Network)
        } else if let Some(document) = self.cached(key).await {
            (document, Tier::StaleCache)
        } else {
            (self.bundled_document(key).await?, Tier::Bundled)
        };

        tracing::debug!(locale = %key, %tier, keys = document.len(), "Resolved translations");
        Ok(Resolution { document, tier })
    }

    /// Tier 1. Never touches the network.
    async fn fresh_cached(&self, key: &LocaleKey) -> Option<TranslationDocument> {
        if !self.cache.exists(key).await {
            tracing::debug!(locale = %key, "No cache entry");
            return None;
        }

        let modified = match self.cache.last_modified(key).await {
            Ok(modified) => modified,
            Err(e) => {
                tracing::debug!(locale = %key, error = %e, "Cache entry vanished");
                return None;
            }
        };

        if !is_fresh(modified, SystemTime::now(), self.config.freshness_window()) {
            tracing::debug!(locale = %key, "Cache entry is stale");
            return None;
        }

        self.read_cached(key).await
    }

    /// Tier 2.
    async fn fetch_remote(&self, key: &LocaleKey) -> Option<TranslationDocument> {
        if !self.connectivity.is_reachable().await {
            tracing::debug!(locale = %key, "Network unreachable, skipping remote fetch");
            return None;
        }

        let url = self.config.request_url(key);
        let timeout = self.config.request_timeout();

        // Dropping the fetch future on timeout cancels the in-flight request.
        let response = match tokio::time::timeout(timeout, self.fetcher.get(&url)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(locale = %key, %url, error = %e, "Failed to fetch translations");
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    locale = %key,
                    %url,
                    ?timeout,
                    "Timed out fetching translations"
                );
                return None;
            }
        };

        if !response.is_ok() {
            tracing::warn!(locale = %key, %url, status = response.status, "Unexpected response status");
            return None;
        }

        let text = match String::from_utf8(response.body) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(locale = %key, %url, error = %e, "Response body is not UTF-8");
                return None;
            }
        };

        let Some(document) = parse_document(&text) else {
            tracing::warn!(locale = %key, %url, bytes = text.len(), "Response body is not a translation document");
            return None;
        };

        if let Err(e) = self.cache.write(key, &text).await {
            tracing::warn!(locale = %key, error = %e, "Failed to cache fetched translations");
        }

        Some(document)
    }

    /// Tier 3: the cache entry regardless of age.
    async fn cached(&self, key: &LocaleKey) -> Option<TranslationDocument> {
        if !self.cache.exists(key).await {
            return None;
        }

        self.read_cached(key).await
    }

    /// Reads and parses an entry already known to exist.
    async fn read_cached(&self, key: &LocaleKey) -> Option<TranslationDocument> {
        match self.cache.read(key).await {
            Ok(text) => {
                let document = parse_document(&text);
                if document.is_none() {
                    tracing::warn!(locale = %key, "Ignoring unreadable cache entry");
                }
                document
            }
            Err(e) => {
                tracing::debug!(locale = %key, error = %e, "Cache entry vanished");
                None
            }
        }
    }

    /// Tier 4.
    async fn bundled_document(&self, key: &LocaleKey) -> Result<TranslationDocument, ResolveError> {
        let path = bundled_path(self.config.bundled_prefix(), key);

        let text = match self.bundled.read(&path).await {
            Ok(text) => text,
            Err(source) => {
                tracing::error!(locale = %key, %path, error = %source, "Bundled translations missing");
                return Err(ResolveError::BundledUnavailable { locale: key.clone(), path, source });
            }
        };

        parse_document(&text).ok_or_else(|| {
            tracing::error!(locale = %key, %path, "Bundled translations are corrupt");
            ResolveError::BundledInvalid { locale: key.clone(), path }
        })
    }
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine").field("config", &self.config).finish_non_exhaustive()
    }
}

#[async_trait]
impl AssetLoader for ResolutionEngine {
    async fn load(
        &self,
        _path: &str,
        locale: &LocaleKey,
    ) -> Result<TranslationDocument, ResolveError> {
        Self::load(self, locale).await
    }
}

/// An entry is fresh while its age is at most `window` (inclusive).
///
/// A timestamp in the future counts as age zero.
fn is_fresh(modified: SystemTime, now: SystemTime, window: Duration) -> bool {
    now.duration_since(modified).unwrap_or(Duration::ZERO) <= window
}
