//! Core types used throughout the project.

use std::fmt;

use serde_json::{
    Map,
    Value,
};

/// A parsed translation document (top-level JSON object).
pub type TranslationDocument = Map<String, Value>;

/// Locale identifier such as `en` or `ar-SA`.
///
/// Opaque: it is used verbatim as the cache file stem and appended to the
/// fetch URL, so no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleKey(String);

impl LocaleKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocaleKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for LocaleKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<LocaleKey> for String {
    fn from(key: LocaleKey) -> Self {
        key.0
    }
}

/// The tier that produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Cache entry within the freshness window.
    FreshCache,
    /// Remote source, written through to the cache.
    Network,
    /// Cache entry of any age.
    StaleCache,
    /// Document shipped with the application.
    Bundled,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FreshCache => "fresh-cache",
            Self::Network => "network",
            Self::StaleCache => "stale-cache",
            Self::Bundled => "bundled",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a resolution: the document and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: TranslationDocument,
    pub tier: Tier,
}

/// Parses `text` into a document.
///
/// Returns `None` for empty text, malformed JSON, or a top-level value that
/// is not an object.
#[must_use]
pub fn parse_document(text: &str) -> Option<TranslationDocument> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "Translation document is not a JSON object");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Translation document is not valid JSON");
            None
        }
    }
}

/// Human-readable name of a JSON value's kind.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("en")]
    #[case("ar-SA")]
    #[case("zh_Hant_TW")]
    fn locale_key_is_used_verbatim(#[case] raw: &str) {
        let key = LocaleKey::from(raw);

        assert_that!(key.as_str(), eq(raw));
        assert_that!(key.to_string(), eq(raw));
        assert_that!(String::from(key), eq(raw));
    }

    #[rstest]
    fn parse_document_keeps_nested_values() {
        let doc = parse_document(r#"{"greeting":"hi","count":3,"nested":{"a":[1,2]}}"#).unwrap();

        assert_that!(doc.get("greeting"), some(eq(&json!("hi"))));
        assert_that!(doc.get("count"), some(eq(&json!(3))));
        assert_that!(doc.get("nested").and_then(|n| n.get("a")), some(eq(&json!([1, 2]))));
    }

    #[rstest]
    #[case::empty("")]
    #[case::truncated(r#"{"a":"b""#)]
    #[case::garbage("<html>502 Bad Gateway</html>")]
    #[case::array("[1,2,3]")]
    #[case::string(r#""hello""#)]
    #[case::null("null")]
    fn parse_document_rejects(#[case] text: &str) {
        assert_that!(parse_document(text), none());
    }

    #[rstest]
    fn parse_document_accepts_empty_object() {
        assert_that!(parse_document("{}").map(|doc| doc.len()), some(eq(0)));
    }

    #[rstest]
    fn tier_display_names() {
        assert_that!(Tier::FreshCache.to_string(), eq("fresh-cache"));
        assert_that!(Tier::Bundled.to_string(), eq("bundled"));
    }
}
