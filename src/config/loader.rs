//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    ResolverSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".translation-resolver.json";

/// ディレクトリから設定を読み込む
///
/// `.translation-resolver.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_dir(dir: &Path) -> Result<Option<ResolverSettings>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: ResolverSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// 設定を読み込み、バリデーションする
///
/// 設定ファイルがない場合はデフォルト値を使う
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
/// - バリデーションエラー
pub fn load_settings(dir: Option<&Path>) -> Result<ResolverSettings, ConfigError> {
    tracing::debug!("Loading settings from: {:?}", dir);

    let settings = match dir {
        Some(dir) => load_from_dir(dir)?.unwrap_or_default(),
        None => ResolverSettings::default(),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    tracing::debug!("Settings loaded successfully: {:?}", settings);

    Ok(settings)
}
