//! translation-resolver
//!
//! ロケールごとの翻訳ドキュメントを、新鮮なキャッシュ → リモート → 古いキャッシュ →
//! 同梱ファイルの順に解決する

pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod types;

/// Test doubles for the source seams.
mod test_utils;

pub use config::ResolverConfig;
pub use engine::{
    AssetLoader,
    ResolutionEngine,
};
pub use error::ResolveError;
pub use types::{
    LocaleKey,
    Resolution,
    Tier,
    TranslationDocument,
};
