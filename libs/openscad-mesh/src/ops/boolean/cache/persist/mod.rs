//! # Persistent Cache Backing
//!
//! In-process caches lose their contents when the process exits. These
//! two optional backends let a cache survive across runs or share
//! results across machines:
//!
//! - [`local`]: a SHA-256 hash-sharded directory on local disk.
//! - [`remote`]: a small key/value protocol client for a shared store.
//!
//! Both are best-effort: a failure to read, write, or reach the backend
//! is logged and treated as a cache miss rather than propagated as an
//! error, since the in-memory caches remain correct without them.

#[cfg(not(target_arch = "wasm32"))]
pub mod local;
pub mod remote;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Glues the local-disk and remote backends into the single "local, then
/// remote" layer [`super::GeometryCache`]/[`super::CGALCache`] consult on
/// top of their in-memory LRU. With no backend configured every call is a
/// no-op, so a cache that never opts into persistence pays nothing for it.
#[derive(Default)]
pub struct PersistLayer {
    #[cfg(not(target_arch = "wasm32"))]
    local: Option<(PathBuf, &'static str)>,
    remote: Option<(remote::RemoteCacheClient, &'static str)>,
}

impl PersistLayer {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Roots this layer's local-disk backend at `root`, namespaced by
    /// `prefix` (see [`config::constants::LOCAL_CACHE_PREFIX_EXACT`] /
    /// `_GEOMETRY`).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_local(mut self, root: PathBuf, prefix: &'static str) -> Self {
        self.local = Some((root, prefix));
        self
    }

    /// Attaches a remote KV backend, namespaced by `prefix` (see
    /// [`config::constants::REMOTE_CACHE_PREFIX_EXACT`] / `_GEOMETRY`).
    pub fn with_remote(mut self, client: remote::RemoteCacheClient, prefix: &'static str) -> Self {
        self.remote = Some((client, prefix));
        self
    }

    /// Tries local disk first (cheaper, no round trip), then the remote
    /// store. A layer with neither configured always misses.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some((root, prefix)) = &self.local {
            if let Some(bytes) = local::read(root, prefix, key) {
                return Some(bytes);
            }
        }
        if let Some((client, prefix)) = &self.remote {
            return client.get(&format!("{prefix}{key}"));
        }
        None
    }

    /// Writes through to every configured backend. Best-effort: a
    /// failure on one backend never blocks the other, matching the
    /// "treat persistence failure as a miss" rule the backends
    /// themselves already follow.
    pub fn put(&self, key: &str, bytes: &[u8]) {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some((root, prefix)) = &self.local {
            if local::write(root, prefix, key, bytes).is_ok() {
                local::evict_if_over_watermark(
                    root,
                    config::constants::LOCAL_CACHE_HIGH_WATER_BYTES,
                    config::constants::LOCAL_CACHE_LOW_WATER_BYTES,
                );
            }
        }
        if let Some((client, prefix)) = &self.remote {
            let _ = client.set(&format!("{prefix}{key}"), bytes);
        }
    }
}
