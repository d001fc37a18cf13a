//! Settings file handling and the engine's runtime configuration.
/// Config file loader
mod loader;
/// Runtime configuration built from settings
mod resolver;
/// Settings types and validation
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_settings,
};
pub use resolver::{
    BaseUrlResolver,
    DEFAULT_BUNDLED_PATH_PREFIX,
    DEFAULT_FRESHNESS_WINDOW,
    DEFAULT_TIMEOUT,
    ResolverConfig,
};
pub use types::{
    ConfigError,
    ResolverSettings,
    ValidationError,
};
