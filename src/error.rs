use thiserror::Error;

use crate::source::AssetError;
use crate::types::LocaleKey;

/// Errors surfaced by the resolution engine.
///
/// Network and cache failures are recovered internally; only a missing or
/// corrupt bundled document (a packaging defect) or a locale outside the
/// configured set reaches the caller.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Bundled translations for locale '{locale}' are unavailable at '{path}': {source}")]
    BundledUnavailable {
        locale: LocaleKey,
        path: String,
        #[source]
        source: AssetError,
    },

    #[error("Bundled translations for locale '{locale}' at '{path}' are not a JSON object")]
    BundledInvalid { locale: LocaleKey, path: String },

    #[error("Locale '{0}' is not supported")]
    UnsupportedLocale(LocaleKey),
}
