//! Immutable runtime configuration of the resolution engine.

use std::collections::{
    HashMap,
    HashSet,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{
    ConfigError,
    ResolverSettings,
};
use crate::types::LocaleKey;

/// Maps a locale to the URL prefix its document is fetched from.
pub type BaseUrlResolver = Arc<dyn Fn(&LocaleKey) -> String + Send + Sync>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_BUNDLED_PATH_PREFIX: &str = "assets/translations";

/// Configuration fixed at engine construction.
#[derive(Clone)]
pub struct ResolverConfig {
    /// URL prefix per locale
    base_url_resolver: BaseUrlResolver,
    /// Upper bound for one remote fetch
    timeout: Duration,
    /// Namespace of bundled documents
    bundled_path_prefix: String,
    /// Maximum age of a fresh cache entry (inclusive)
    cache_freshness_window: Duration,
    /// `None` accepts every locale
    supported_locales: Option<HashSet<LocaleKey>>,
}

impl ResolverConfig {
    /// Config with defaults for everything except the URL resolver.
    pub fn new(base_url_resolver: impl Fn(&LocaleKey) -> String + Send + Sync + 'static) -> Self {
        Self {
            base_url_resolver: Arc::new(base_url_resolver),
            timeout: DEFAULT_TIMEOUT,
            bundled_path_prefix: DEFAULT_BUNDLED_PATH_PREFIX.to_string(),
            cache_freshness_window: DEFAULT_FRESHNESS_WINDOW,
            supported_locales: None,
        }
    }

    /// Config whose URL prefix is the same for every locale.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self::new(move |_| base_url.clone())
    }

    /// Builds the config from validated settings.
    ///
    /// # Errors
    /// Returns [`ConfigError::ValidationErrors`] when the settings are invalid.
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let base_url = settings.base_url.clone();
        let overrides: HashMap<LocaleKey, String> = settings
            .locale_base_urls
            .iter()
            .map(|(locale, url)| (LocaleKey::from(locale.as_str()), url.clone()))
            .collect();

        let mut config = Self::new(move |key| {
            overrides.get(key).map_or_else(|| base_url.clone(), Clone::clone)
        })
        .timeout(Duration::from_millis(settings.timeout_ms))
        .bundled_path_prefix(settings.bundled_path_prefix.clone())
        .cache_freshness_window(Duration::from_secs(settings.cache_freshness_secs));

        if let Some(locales) = &settings.supported_locales {
            config = config.supported_locales(locales.iter().map(String::as_str));
        }

        Ok(config)
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn bundled_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bundled_path_prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn cache_freshness_window(mut self, window: Duration) -> Self {
        self.cache_freshness_window = window;
        self
    }

    #[must_use]
    pub fn supported_locales<I, K>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<LocaleKey>,
    {
        self.supported_locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    /// Fetch URL for `key`: the resolved prefix with the locale appended.
    #[must_use]
    pub fn request_url(&self, key: &LocaleKey) -> String {
        format!("{}{key}", (self.base_url_resolver)(key))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn bundled_prefix(&self) -> &str {
        &self.bundled_path_prefix
    }

    #[must_use]
    pub const fn freshness_window(&self) -> Duration {
        self.cache_freshness_window
    }

    /// Whether `key` may be loaded. Always true without a configured set.
    #[must_use]
    pub fn is_supported(&self, key: &LocaleKey) -> bool {
        self.supported_locales.as_ref().is_none_or(|locales| locales.contains(key))
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("timeout", &self.timeout)
            .field("bundled_path_prefix", &self.bundled_path_prefix)
            .field("cache_freshness_window", &self.cache_freshness_window)
            .field("supported_locales", &self.supported_locales)
            .finish_non_exhaustive()
    }
}
