//! # Geometry Caches
//!
//! Two process-wide caches sit in front of the geometry evaluator and
//! the exact kernel, both built on the generic cost-bounded [`lru::Cache`]:
//!
//! - [`GeometryCache`] stores `PolySet`/`Polygon2d` results.
//! - [`CGALCache`] stores exact (`Nef3`) results.
//!
//! Both are keyed by the fingerprint string of the node they were
//! computed for: nodes with identical fingerprints are guaranteed to
//! produce identical geometry, so a hit on either cache can stand in for
//! re-evaluating the subtree.
//!
//! These are not bare global statics — `GeometryCache::global()`/
//! `CGALCache::global()` hand out a lazily-created shared instance behind
//! a `OnceLock`, while a host that wants isolated caches (tests, multiple
//! concurrent documents) can construct its own via `new`.
//!
//! Both caches can optionally be backed by the [`persist`] layer: a miss
//! in the in-memory LRU falls through to local disk and/or a remote KV
//! store before recomputing, and an insert writes through to whichever
//! backends are configured. Persistence is opt-in — `global()`'s
//! singleton starts with it disabled — via `with_local_persist`/
//! `with_remote_persist`.

pub mod lru;
pub mod persist;

use crate::geometry::{Geometry, NefHandle, Polygon2d};
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, OnceLock};

/// One entry in a geometry cache: the geometry itself plus any warning
/// text emitted while constructing it, so a cache hit can still replay
/// the warnings the first evaluation produced.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub geometry: Geometry,
    pub message: String,
}

impl CacheEntry {
    pub fn new(geometry: Geometry, message: impl Into<String>) -> Self {
        Self { geometry, message: message.into() }
    }

    fn cost(&self) -> usize {
        self.geometry.memsize()
    }

    /// Serializes this entry for the persistent cache layers, via
    /// `bincode`. Returns `None` for `GeometryList` entries — `with_cache`
    /// never produces one, so there is nothing exercising that shape yet.
    /// `Nef3`/`FastPoly` persist their triangulated mesh only; the exact
    /// kernel handle and the lazy Nef fallback are recomputed on demand.
    fn to_persisted_bytes(&self) -> Option<Vec<u8>> {
        let geometry = match &self.geometry {
            Geometry::PolySet(m) => PersistedGeometry::PolySet(m.clone()),
            Geometry::Polygon2d(p) => PersistedGeometry::Polygon2d(p.clone()),
            Geometry::Nef3(n) => PersistedGeometry::Nef3(n.as_mesh().clone()),
            Geometry::FastPoly { mesh, .. } => PersistedGeometry::FastPoly(mesh.clone()),
            Geometry::GeometryList(_) => return None,
        };
        let persisted = PersistedEntry { geometry, message: self.message.clone() };
        bincode::serialize(&persisted).ok()
    }

    fn from_persisted_bytes(bytes: &[u8]) -> Option<Self> {
        let persisted: PersistedEntry = bincode::deserialize(bytes).ok()?;
        let geometry = match persisted.geometry {
            PersistedGeometry::PolySet(m) => Geometry::PolySet(m),
            PersistedGeometry::Polygon2d(p) => Geometry::Polygon2d(p),
            PersistedGeometry::Nef3(m) => Geometry::Nef3(NefHandle::from_triangulated(m)),
            PersistedGeometry::FastPoly(m) => Geometry::FastPoly { mesh: m, nef_fallback: None },
        };
        Some(CacheEntry { geometry, message: persisted.message })
    }
}

/// On-disk/on-wire mirror of [`Geometry`]'s round-trippable variants.
#[derive(Serialize, Deserialize)]
enum PersistedGeometry {
    PolySet(Mesh),
    Polygon2d(Polygon2d),
    Nef3(Mesh),
    FastPoly(Mesh),
}

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    geometry: PersistedGeometry,
    message: String,
}

/// Cache of `PolySet`/`Polygon2d` results, keyed by fingerprint.
pub struct GeometryCache {
    inner: Mutex<lru::Cache<String, CacheEntry>>,
    persist: persist::PersistLayer,
}

impl GeometryCache {
    pub fn new(max_cost_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(lru::Cache::new(max_cost_bytes)),
            persist: persist::PersistLayer::disabled(),
        }
    }

    pub fn with_default_budget() -> Self {
        Self::new(config::constants::GEOMETRY_CACHE_DEFAULT_BYTES)
    }

    /// Process-wide instance, lazily created on first access.
    pub fn global() -> &'static GeometryCache {
        static INSTANCE: OnceLock<GeometryCache> = OnceLock::new();
        INSTANCE.get_or_init(GeometryCache::with_default_budget)
    }

    /// Attaches a local-disk persistence layer rooted at `root`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_local_persist(mut self, root: std::path::PathBuf) -> Self {
        self.persist = self.persist.with_local(root, config::constants::LOCAL_CACHE_PREFIX_GEOMETRY);
        self
    }

    /// Attaches a remote KV persistence layer.
    pub fn with_remote_persist(mut self, client: persist::remote::RemoteCacheClient) -> Self {
        self.persist = self.persist.with_remote(client, config::constants::REMOTE_CACHE_PREFIX_GEOMETRY);
        self
    }

    pub fn get(&self, fingerprint: &str) -> Option<CacheEntry> {
        if let Some(hit) = self.inner.lock().unwrap().get(&fingerprint.to_string()).cloned() {
            return Some(hit);
        }
        let bytes = self.persist.get(fingerprint)?;
        let entry = CacheEntry::from_persisted_bytes(&bytes)?;
        let cost = entry.cost();
        self.inner.lock().unwrap().insert(fingerprint.to_string(), entry.clone(), cost);
        Some(entry)
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.inner.lock().unwrap().contains(&fingerprint.to_string())
    }

    pub fn insert(&self, fingerprint: impl Into<String>, entry: CacheEntry) -> bool {
        let fingerprint = fingerprint.into();
        if let Some(bytes) = entry.to_persisted_bytes() {
            self.persist.put(&fingerprint, &bytes);
        }
        let cost = entry.cost();
        self.inner.lock().unwrap().insert(fingerprint, entry, cost)
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn total_cost(&self) -> usize {
        self.inner.lock().unwrap().total_cost()
    }

    pub fn set_max_cost(&self, bytes: usize) {
        self.inner.lock().unwrap().set_max_cost(bytes);
    }
}

/// Cache of exact (`Nef3`) results, keyed by fingerprint.
///
/// `accepts_geometry` is the admission gate: only geometries whose kind
/// is exact belong here. A caller holding non-exact geometry should
/// redirect the insert to [`GeometryCache`] instead — `CGALCache::insert`
/// enforces this by rejecting the insert (returning `false`) rather than
/// silently storing the wrong kind.
pub struct CGALCache {
    inner: Mutex<lru::Cache<String, CacheEntry>>,
    persist: persist::PersistLayer,
}

impl CGALCache {
    pub fn new(max_cost_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(lru::Cache::new(max_cost_bytes)),
            persist: persist::PersistLayer::disabled(),
        }
    }

    pub fn with_default_budget() -> Self {
        Self::new(config::constants::CGAL_CACHE_DEFAULT_BYTES)
    }

    pub fn global() -> &'static CGALCache {
        static INSTANCE: OnceLock<CGALCache> = OnceLock::new();
        INSTANCE.get_or_init(CGALCache::with_default_budget)
    }

    /// Attaches a local-disk persistence layer rooted at `root`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_local_persist(mut self, root: std::path::PathBuf) -> Self {
        self.persist = self.persist.with_local(root, config::constants::LOCAL_CACHE_PREFIX_EXACT);
        self
    }

    /// Attaches a remote KV persistence layer.
    pub fn with_remote_persist(mut self, client: persist::remote::RemoteCacheClient) -> Self {
        self.persist = self.persist.with_remote(client, config::constants::REMOTE_CACHE_PREFIX_EXACT);
        self
    }

    /// Only exact geometry kinds are admitted into this cache.
    pub fn accepts_geometry(geometry: &Geometry) -> bool {
        geometry.is_exact()
    }

    pub fn get(&self, fingerprint: &str) -> Option<CacheEntry> {
        if let Some(hit) = self.inner.lock().unwrap().get(&fingerprint.to_string()).cloned() {
            return Some(hit);
        }
        let bytes = self.persist.get(fingerprint)?;
        let entry = CacheEntry::from_persisted_bytes(&bytes)?;
        if !Self::accepts_geometry(&entry.geometry) {
            return None;
        }
        let cost = entry.cost();
        self.inner.lock().unwrap().insert(fingerprint.to_string(), entry.clone(), cost);
        Some(entry)
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.inner.lock().unwrap().contains(&fingerprint.to_string())
    }

    /// Returns `false` without inserting if `entry.geometry` is not an
    /// exact kind.
    pub fn insert(&self, fingerprint: impl Into<String>, entry: CacheEntry) -> bool {
        if !Self::accepts_geometry(&entry.geometry) {
            return false;
        }
        let fingerprint = fingerprint.into();
        if let Some(bytes) = entry.to_persisted_bytes() {
            self.persist.put(&fingerprint, &bytes);
        }
        let cost = entry.cost();
        self.inner.lock().unwrap().insert(fingerprint, entry, cost)
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn total_cost(&self) -> usize {
        self.inner.lock().unwrap().total_cost()
    }

    pub fn set_max_cost(&self, bytes: usize) {
        self.inner.lock().unwrap().set_max_cost(bytes);
    }
}

/// Picks the cache appropriate to `entry.geometry`'s kind and inserts
/// into it.
pub fn smart_cache_insert(fingerprint: &str, entry: CacheEntry) {
    if CGALCache::accepts_geometry(&entry.geometry) {
        CGALCache::global().insert(fingerprint.to_string(), entry);
    } else {
        GeometryCache::global().insert(fingerprint.to_string(), entry);
    }
}

/// Looks up `fingerprint` in whichever cache is appropriate. When
/// `prefer_nef` is set, only `CGALCache` is consulted (the caller
/// specifically needs an exact result); otherwise `GeometryCache` is
/// tried first since non-exact hits are the common case.
pub fn smart_cache_get(fingerprint: &str, prefer_nef: bool) -> Option<CacheEntry> {
    if prefer_nef {
        return CGALCache::global().get(fingerprint);
    }
    GeometryCache::global()
        .get(fingerprint)
        .or_else(|| CGALCache::global().get(fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NefHandle;
    use crate::mesh::Mesh;
    use glam::DVec3;

    fn triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn geometry_cache_round_trip() {
        let cache = GeometryCache::new(1_000_000);
        let entry = CacheEntry::new(Geometry::PolySet(triangle_mesh()), "");
        assert!(cache.insert("fp1", entry));
        assert!(cache.get("fp1").is_some());
    }

    #[test]
    fn cgal_cache_rejects_non_exact_geometry() {
        let cache = CGALCache::new(1_000_000);
        let entry = CacheEntry::new(Geometry::PolySet(triangle_mesh()), "");
        assert!(!cache.insert("fp1", entry));
        assert!(cache.get("fp1").is_none());
    }

    #[test]
    fn cgal_cache_accepts_exact_geometry() {
        let cache = CGALCache::new(1_000_000);
        let entry = CacheEntry::new(
            Geometry::Nef3(NefHandle::from_triangulated(triangle_mesh())),
            "",
        );
        assert!(cache.insert("fp1", entry));
        assert!(cache.get("fp1").is_some());
    }

    #[test]
    fn persisted_entry_round_trips_through_bytes() {
        let entry = CacheEntry::new(Geometry::PolySet(triangle_mesh()), "built from cache");
        let bytes = entry.to_persisted_bytes().expect("PolySet persists");
        let restored = CacheEntry::from_persisted_bytes(&bytes).expect("bytes deserialize");
        assert_eq!(restored.message, "built from cache");
        match restored.geometry {
            Geometry::PolySet(m) => assert_eq!(m.triangle_count(), 1),
            _ => panic!("expected PolySet"),
        }
    }

    #[test]
    fn geometry_list_is_not_persisted() {
        let entry = CacheEntry::new(
            Geometry::GeometryList(vec![(0, Geometry::PolySet(triangle_mesh()))]),
            "",
        );
        assert!(entry.to_persisted_bytes().is_none());
    }

    #[test]
    fn local_persist_survives_a_fresh_cache_instance() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GeometryCache::new(1_000_000).with_local_persist(dir.path().to_path_buf());
        let entry = CacheEntry::new(Geometry::PolySet(triangle_mesh()), "");
        assert!(cache.insert("fp-disk", entry));

        let fresh = GeometryCache::new(1_000_000).with_local_persist(dir.path().to_path_buf());
        assert!(!fresh.contains("fp-disk")); // not yet in this instance's LRU
        let hit = fresh.get("fp-disk").expect("falls through to disk");
        match hit.geometry {
            Geometry::PolySet(m) => assert_eq!(m.triangle_count(), 1),
            _ => panic!("expected PolySet"),
        }
    }

    #[test]
    fn cache_without_persist_configured_is_unaffected() {
        let cache = GeometryCache::new(1_000_000);
        let entry = CacheEntry::new(Geometry::PolySet(triangle_mesh()), "");
        assert!(cache.insert("fp-mem-only", entry));
        assert!(cache.get("fp-mem-only").is_some());
    }

    #[test]
    fn smart_cache_insert_routes_by_kind() {
        GeometryCache::global().clear();
        CGALCache::global().clear();

        smart_cache_insert("poly", CacheEntry::new(Geometry::PolySet(triangle_mesh()), ""));
        smart_cache_insert(
            "nef",
            CacheEntry::new(Geometry::Nef3(NefHandle::from_triangulated(triangle_mesh())), ""),
        );

        assert!(GeometryCache::global().contains("poly"));
        assert!(CGALCache::global().contains("nef"));
        assert!(!GeometryCache::global().contains("nef"));
    }
}
