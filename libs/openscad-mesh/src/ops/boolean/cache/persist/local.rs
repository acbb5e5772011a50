//! Local-disk cache backend.
//!
//! Entries live under `<root>/<prefix><hash[0..2]>/<hash[2..]>`, where
//! `hash` is the lowercase hex SHA-256 of the fingerprint key and
//! `prefix` is [`config::constants::LOCAL_CACHE_PREFIX_EXACT`] or
//! [`config::constants::LOCAL_CACHE_PREFIX_GEOMETRY`]. Sharding by the
//! first byte of the hash keeps any one directory from accumulating more
//! entries than common filesystems handle comfortably.
//!
//! Writes go through a temp file in the shard directory followed by a
//! rename, so a reader never observes a partially written entry.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

fn hex_hash(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn entry_path(root: &Path, prefix: &str, key: &str) -> PathBuf {
    let hash = hex_hash(key);
    let (shard, rest) = hash.split_at(2);
    root.join(format!("{prefix}{shard}")).join(rest)
}

/// Reads the bytes stored for `key`, if present. Treats any I/O error as
/// a miss rather than propagating it — disk cache corruption should
/// degrade to recomputation, not fail the build.
pub fn read(root: &Path, prefix: &str, key: &str) -> Option<Vec<u8>> {
    let path = entry_path(root, prefix, key);
    fs::read(path).ok()
}

/// Writes `bytes` for `key`, creating the shard directory if needed.
/// Uses a temp-file-then-rename so concurrent readers never see a
/// half-written file.
pub fn write(root: &Path, prefix: &str, key: &str, bytes: &[u8]) -> io::Result<()> {
    let path = entry_path(root, prefix, key);
    let dir = path.parent().expect("entry path always has a shard directory");
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::Write::write_all(&mut tmp, bytes)?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}

/// Total bytes resident under `root`, summed across every shard.
pub fn total_size(root: &Path) -> u64 {
    walk_files(root).map(|(_, meta)| meta.len()).sum()
}

/// Evicts entries oldest-by-mtime-first until resident size is at or
/// below `low_water`. Only runs the walk if current size exceeds
/// `high_water`, per the watermark eviction policy.
pub fn evict_if_over_watermark(root: &Path, high_water: u64, low_water: u64) {
    let mut entries: Vec<(PathBuf, u64, SystemTime)> = walk_files(root)
        .filter_map(|(path, meta)| {
            let mtime = meta.modified().ok()?;
            Some((path, meta.len(), mtime))
        })
        .collect();

    let total: u64 = entries.iter().map(|(_, size, _)| *size).sum();
    if total <= high_water {
        return;
    }

    entries.sort_by_key(|(_, _, mtime)| *mtime);

    let mut remaining = total;
    for (path, size, _) in entries {
        if remaining <= low_water {
            break;
        }
        if fs::remove_file(&path).is_ok() {
            remaining = remaining.saturating_sub(size);
        }
    }
}

fn walk_files(root: &Path) -> impl Iterator<Item = (PathBuf, fs::Metadata)> {
    let mut out = Vec::new();
    if let Ok(shards) = fs::read_dir(root) {
        for shard in shards.flatten() {
            if let Ok(files) = fs::read_dir(shard.path()) {
                for file in files.flatten() {
                    if let Ok(meta) = file.metadata() {
                        if meta.is_file() {
                            out.push((file.path(), meta));
                        }
                    }
                }
            }
        }
    }
    out.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g", "fingerprint-a", b"hello").unwrap();
        assert_eq!(read(dir.path(), "g", "fingerprint-a"), Some(b"hello".to_vec()));
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read(dir.path(), "g", "nothing-here"), None);
    }

    #[test]
    fn sharding_splits_by_hash_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g", "abc", b"1").unwrap();
        let hash = hex_hash("abc");
        let shard_dir = dir.path().join(format!("g{}", &hash[0..2]));
        assert!(shard_dir.is_dir());
    }

    #[test]
    fn watermark_eviction_trims_to_low_water() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            write(dir.path(), "g", &format!("key-{i}"), &vec![0u8; 1024]).unwrap();
        }
        let before = total_size(dir.path());
        assert!(before >= 20 * 1024);

        evict_if_over_watermark(dir.path(), 10 * 1024, 4 * 1024);
        let after = total_size(dir.path());
        assert!(after <= 10 * 1024, "expected eviction to trim size, got {after}");
    }

    #[test]
    fn watermark_eviction_is_noop_below_high_water() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g", "only-one", &vec![0u8; 100]).unwrap();
        evict_if_over_watermark(dir.path(), 10 * 1024, 4 * 1024);
        assert_eq!(total_size(dir.path()), 100);
    }
}
