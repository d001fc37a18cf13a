//! Command-line entry point: resolves one locale and prints its document.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use translation_resolver::config::{
    ResolverSettings,
    load_settings,
};
use translation_resolver::source::{
    ConnectivityOracle,
    DEFAULT_PROBE_TIMEOUT,
    DirAssetStore,
    FsCacheStore,
    HttpFetcher,
    StaticConnectivity,
    TcpProbe,
};
use translation_resolver::{
    LocaleKey,
    ResolutionEngine,
    ResolverConfig,
};

/// Resolve translations for a locale
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Locale to resolve, e.g. `en` or `ar-SA`
    locale: String,

    /// Directory containing `.translation-resolver.json`
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Root directory of bundled assets
    #[arg(long, default_value = ".")]
    assets_root: PathBuf,

    /// Skip the network tier
    #[arg(long)]
    offline: bool,

    /// Wrap the output as `{"tier": ..., "document": ...}`
    #[arg(long)]
    show_tier: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(Some(cli.config_dir.as_path())).context("Failed to load settings")?;
    let engine = build_engine(&settings, &cli)?;

    let resolution = engine.resolve(&LocaleKey::from(cli.locale.as_str())).await?;
    tracing::info!(locale = %cli.locale, tier = %resolution.tier, "Translations resolved");

    let output = if cli.show_tier {
        serde_json::json!({ "tier": resolution.tier.as_str(), "document": resolution.document })
    } else {
        serde_json::Value::Object(resolution.document)
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}

/// Wires the production collaborators into an engine.
fn build_engine(settings: &ResolverSettings, cli: &Cli) -> anyhow::Result<ResolutionEngine> {
    let config = ResolverConfig::from_settings(settings)?;
    let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
    let cache = settings.cache_dir.as_ref().map_or_else(FsCacheStore::in_temp_dir, FsCacheStore::under);
    tracing::debug!(cache = %cache.root().display(), "Using translation cache");

    Ok(ResolutionEngine::new(
        config,
        connectivity(settings, cli.offline),
        Arc::new(fetcher),
        Arc::new(cache),
        Arc::new(DirAssetStore::new(&cli.assets_root)),
    ))
}

/// TCP check against `connectivityProbe` or the base URL's host; `--offline` always reports unreachable.
fn connectivity(settings: &ResolverSettings, offline: bool) -> Arc<dyn ConnectivityOracle> {
    if offline {
        return Arc::new(StaticConnectivity::offline());
    }

    let probe = settings.connectivity_probe.as_ref().map_or_else(
        || {
            url::Url::parse(&settings.base_url)
                .ok()
                .and_then(|url| TcpProbe::for_url(&url, DEFAULT_PROBE_TIMEOUT))
        },
        |address| Some(TcpProbe::new(address.as_str(), DEFAULT_PROBE_TIMEOUT)),
    );

    match probe {
        Some(probe) => {
            tracing::debug!(address = probe.address(), "Probing connectivity");
            Arc::new(probe)
        }
        None => Arc::new(StaticConnectivity::online()),
    }
}
