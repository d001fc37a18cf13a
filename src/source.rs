//! Collaborators consulted by the resolution engine.
//!
//! Each collaborator is a trait object seam so the engine can be driven by
//! real I/O in production and by in-memory doubles in tests.

/// Bundled (shipped) translation documents
mod bundled;
/// Local translation cache
mod cache;
/// Network reachability probes
mod connectivity;
/// Remote translation source
mod remote;

pub use bundled::{
    AssetError,
    BundledAssetStore,
    DirAssetStore,
    MemoryAssetStore,
    bundled_path,
};
pub use cache::{
    CACHE_DIR_NAME,
    CacheError,
    FsCacheStore,
    LocalCacheStore,
    MemoryCacheStore,
};
pub use connectivity::{
    ConnectivityOracle,
    DEFAULT_PROBE_TIMEOUT,
    StaticConnectivity,
    TcpProbe,
};
pub use remote::{
    FetchError,
    FetchResponse,
    HttpFetcher,
    RemoteFetcher,
};
