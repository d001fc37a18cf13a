//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される collaborator のフェイクを提供します。
#![cfg(test)]

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::time::{
    Duration,
    SystemTime,
};

use async_trait::async_trait;

use crate::source::{
    CacheError,
    ConnectivityOracle,
    FetchError,
    FetchResponse,
    LocalCacheStore,
    MemoryCacheStore,
    RemoteFetcher,
};
use crate::types::LocaleKey;

/// Connectivity oracle that counts how often it was asked.
#[derive(Debug)]
pub(crate) struct CountingConnectivity {
    /// Fixed answer
    reachable: bool,
    /// Number of `is_reachable` calls
    calls: AtomicUsize,
}

impl CountingConnectivity {
    pub(crate) const fn new(reachable: bool) -> Self {
        Self { reachable, calls: AtomicUsize::new(0) }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityOracle for CountingConnectivity {
    async fn is_reachable(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reachable
    }
}

/// Fetcher with a canned outcome and an optional delay.
#[derive(Debug)]
pub(crate) struct FakeFetcher {
    /// `None` simulates a transport error
    response: Option<FetchResponse>,
    /// Time spent before answering
    delay: Duration,
    /// Requests started
    calls: AtomicUsize,
    /// Requests that ran to completion (not cancelled)
    completed: AtomicUsize,
    /// URL of the most recent request
    last_url: Mutex<Option<String>>,
}

impl FakeFetcher {
    /// Fetcher answering every request with `response`
    fn with_response(response: Option<FetchResponse>) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    pub(crate) fn respond(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::with_response(Some(FetchResponse::new(status, body)))
    }

    pub(crate) fn failing() -> Self {
        Self::with_response(None)
    }

    pub(crate) const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteFetcher for FakeFetcher {
    #[allow(clippy::unwrap_used)]
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(url.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        self.response
            .clone()
            .ok_or_else(|| FetchError::Unavailable("connection reset by peer".to_string()))
    }
}

/// Cache store that counts `exists` calls and can simulate a vanished entry.
#[derive(Debug, Default)]
pub(crate) struct FakeCacheStore {
    /// Backing entries when not vanished
    inner: MemoryCacheStore,
    /// `exists` reports true while every other operation fails
    vanished: bool,
    /// Number of `exists` calls
    exists_calls: AtomicUsize,
    /// Number of `write` calls, failed ones included
    write_calls: AtomicUsize,
}

impl FakeCacheStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store whose entry disappears after every existence check and which rejects writes.
    pub(crate) fn vanished() -> Self {
        Self { vanished: true, ..Self::default() }
    }

    pub(crate) async fn insert_at(&self, key: LocaleKey, content: &str, modified: SystemTime) {
        self.inner.insert_at(key, content, modified).await;
    }

    pub(crate) fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalCacheStore for FakeCacheStore {
    async fn exists(&self, key: &LocaleKey) -> bool {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.vanished || self.inner.exists(key).await
    }

    async fn last_modified(&self, key: &LocaleKey) -> Result<SystemTime, CacheError> {
        if self.vanished {
            return Err(CacheError::Missing(key.clone()));
        }
        self.inner.last_modified(key).await
    }

    async fn read(&self, key: &LocaleKey) -> Result<String, CacheError> {
        if self.vanished {
            return Err(CacheError::Missing(key.clone()));
        }
        self.inner.read(key).await
    }

    async fn write(&self, key: &LocaleKey, content: &str) -> Result<(), CacheError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.vanished {
            return Err(CacheError::Io {
                path: PathBuf::from(format!("translations-res/{key}.json")),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.inner.write(key, content).await
    }
}
