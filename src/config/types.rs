use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "localeBaseUrls.en")
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings file model (`.translation-resolver.json`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverSettings {
    /// Prefix of the fetch URL; the locale is appended verbatim.
    pub base_url: String,

    /// Per-locale replacement for `base_url`.
    pub locale_base_urls: HashMap<String, String>,

    pub timeout_ms: u64,

    /// Namespace of bundled documents (`<prefix>/<locale>.json`).
    pub bundled_path_prefix: String,

    /// Age in seconds after which a cache entry is stale. Inclusive.
    pub cache_freshness_secs: u64,

    /// Parent directory of `translations-res`. Defaults to the OS temp dir.
    pub cache_dir: Option<String>,

    /// `host:port` used to decide whether the network is reachable.
    /// Defaults to the host of `base_url`.
    pub connectivity_probe: Option<String>,

    /// Locales `load` accepts. `None` accepts every locale.
    pub supported_locales: Option<Vec<String>>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            locale_base_urls: HashMap::new(),
            timeout_ms: 5_000,
            bundled_path_prefix: "assets/translations".to_string(),
            cache_freshness_secs: 24 * 60 * 60,
            cache_dir: None,
            connectivity_probe: None,
            supported_locales: None,
        }
    }
}

impl ResolverSettings {
    /// # Errors
    /// - Required field is empty
    /// - URL is not http(s)
    /// - Zero timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.base_url.is_empty() {
            errors.push(ValidationError::new(
                "baseUrl",
                "The base URL cannot be empty. Example: \"https://cdn.example.com/i18n/\"",
            ));
        } else if let Err(message) = check_http_url(&self.base_url) {
            errors.push(ValidationError::new("baseUrl", message));
        }

        let mut overrides: Vec<_> = self.locale_base_urls.iter().collect();
        overrides.sort();
        for (locale, url) in overrides {
            if let Err(message) = check_http_url(url) {
                errors.push(ValidationError::new(format!("localeBaseUrls.{locale}"), message));
            }
        }

        if self.timeout_ms == 0 {
            errors.push(ValidationError::new(
                "timeoutMs",
                "The timeout must be greater than zero. Example: 5000",
            ));
        }

        if self.bundled_path_prefix.trim_matches('/').is_empty() {
            errors.push(ValidationError::new(
                "bundledPathPrefix",
                "The prefix cannot be empty. Example: \"assets/translations\"",
            ));
        }

        if let Some(dir) = &self.cache_dir
            && dir.is_empty()
        {
            errors.push(ValidationError::new(
                "cacheDir",
                "The directory cannot be empty. Remove this field to use the temporary directory",
            ));
        }

        if let Some(probe) = &self.connectivity_probe
            && !is_host_port(probe)
        {
            errors.push(ValidationError::new(
                "connectivityProbe",
                format!("Expected 'host:port', got '{probe}'. Example: \"cdn.example.com:443\""),
            ));
        }

        if let Some(locales) = &self.supported_locales {
            if locales.is_empty() {
                errors.push(ValidationError::new(
                    "supportedLocales",
                    "At least one locale is required, or remove this field to accept every locale",
                ));
            }
            for (index, locale) in locales.iter().enumerate() {
                if locale.is_empty() {
                    errors.push(ValidationError::new(
                        format!("supportedLocales[{index}]"),
                        "The locale cannot be empty",
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Accepts absolute `http`/`https` URLs only.
fn check_http_url(raw: &str) -> Result<(), String> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(format!("Unsupported URL scheme '{}' in '{raw}'", url.scheme())),
        Err(e) => Err(format!("Invalid URL '{raw}': {e}")),
    }
}

/// `host:port` with a non-empty host and a numeric port.
fn is_host_port(raw: &str) -> bool {
    raw.rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn valid() -> ResolverSettings {
        ResolverSettings {
            base_url: "https://cdn.example.com/i18n/".to_string(),
            ..ResolverSettings::default()
        }
    }

    #[rstest]
    fn validate_valid_settings(valid: ResolverSettings) {
        assert_that!(valid.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"baseUrl": "https://cdn.example.com/i18n/", "timeoutMs": 1500}"#;

        let settings: ResolverSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.base_url, eq("https://cdn.example.com/i18n/"));
        assert_that!(settings.timeout_ms, eq(1500));
        assert_that!(settings.bundled_path_prefix, eq("assets/translations"));
        assert_that!(settings.cache_freshness_secs, eq(86_400));
        assert_that!(settings.supported_locales, none());
    }

    #[rstest]
    fn deserialize_locale_overrides() {
        let json = r#"{
            "baseUrl": "https://cdn.example.com/i18n/",
            "localeBaseUrls": {"ar-SA": "https://rtl.example.com/"},
            "supportedLocales": ["en", "ar-SA"]
        }"#;

        let settings: ResolverSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.locale_base_urls.get("ar-SA"), some(eq("https://rtl.example.com/")));
        assert_that!(settings.supported_locales, some(elements_are![eq("en"), eq("ar-SA")]));
    }

    #[rstest]
    fn validate_empty_base_url() {
        let result = ResolverSettings::default().validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("baseUrl")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case("cdn.example.com/i18n/", "Invalid URL")]
    #[case("ftp://cdn.example.com/i18n/", "Unsupported URL scheme 'ftp'")]
    fn validate_bad_base_url(valid: ResolverSettings, #[case] url: &str, #[case] message: &str) {
        let settings = ResolverSettings { base_url: url.to_string(), ..valid };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("baseUrl")),
                field!(ValidationError.message, contains_substring(message))
            ]])
        );
    }

    #[rstest]
    fn validate_bad_locale_override(valid: ResolverSettings) {
        let settings = ResolverSettings {
            locale_base_urls: HashMap::from([("fr".to_string(), "not a url".to_string())]),
            ..valid
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("localeBaseUrls.fr"))])
        );
    }

    #[rstest]
    fn validate_zero_timeout(valid: ResolverSettings) {
        let settings = ResolverSettings { timeout_ms: 0, ..valid };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("timeoutMs")),
                field!(ValidationError.message, contains_substring("greater than zero"))
            ]])
        );
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    fn validate_empty_bundled_prefix(valid: ResolverSettings, #[case] prefix: &str) {
        let settings = ResolverSettings { bundled_path_prefix: prefix.to_string(), ..valid };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("bundledPathPrefix"))])
        );
    }

    #[rstest]
    #[case("cdn.example.com")]
    #[case(":443")]
    #[case("cdn.example.com:https")]
    fn validate_bad_connectivity_probe(valid: ResolverSettings, #[case] probe: &str) {
        let settings = ResolverSettings { connectivity_probe: Some(probe.to_string()), ..valid };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("connectivityProbe"))])
        );
    }

    #[rstest]
    fn validate_supported_locales(valid: ResolverSettings) {
        let empty = ResolverSettings { supported_locales: Some(vec![]), ..valid.clone() };
        let blank = ResolverSettings {
            supported_locales: Some(vec!["en".to_string(), String::new()]),
            ..valid
        };

        assert_that!(
            empty.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("supportedLocales"))])
        );
        assert_that!(
            blank.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("supportedLocales[1]"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = ResolverSettings { timeout_ms: 0, ..ResolverSettings::default() };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. baseUrl"));
        assert_that!(error_message, contains_substring("2. timeoutMs"));
    }
}
