//! Content fingerprints for change detection.
//!
//! A fingerprint folds `(relative path, mtime, size)` for every non-ignored
//! file under a root into one SHA-256 digest, in the canonical
//! `"sha256:<hex>"` format. File contents are never read; touching a file's
//! mtime or changing its size is enough to change the fingerprint.

use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::ignore::IgnoreRules;
use crate::path::relative_unix;
use crate::{Error, Result};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Fingerprint every non-ignored file under `root`.
///
/// Files are folded in lexicographic order of their relative path, so two
/// trees with identical `(path, mtime, size)` sets produce identical
/// fingerprints regardless of directory iteration order.
///
/// Returns `None` when `root` does not exist or is not a directory — an
/// absent tree is a valid observation, not an error.
///
/// # Errors
///
/// Returns an error if any non-ignored entry cannot be stat'ed, since a
/// partial fingerprint would mask changes.
pub fn fingerprint_tree(root: &Path, rules: &IgnoreRules) -> Result<Option<String>> {
    if !root.is_dir() {
        return Ok(None);
    }

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        if entry.depth() == 0 {
            return true;
        }
        if entry.file_type().is_dir() {
            !rules.ignores_dir(&name)
        } else {
            !rules.ignores_file(&name)
        }
    });

    let mut records: Vec<(String, u128, u64)> = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let metadata = entry
            .metadata()
            .map_err(|e| Error::io(entry.path().to_path_buf(), e.into()))?;
        records.push((
            relative_unix(root, entry.path()),
            mtime_nanos(&metadata),
            metadata.len(),
        ));
    }

    records.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    for (path, mtime, size) in &records {
        fold_record(&mut hasher, path, *mtime, *size);
    }
    Ok(Some(format!("{}{:x}", PREFIX, hasher.finalize())))
}

/// Fingerprint a single file by its `(name, mtime, size)` tuple.
///
/// Returns `None` when the file does not exist. Callers must treat
/// absent-to-present and present-to-absent as ordinary transitions.
pub fn fingerprint_file(path: &Path) -> Option<String> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    fold_record(&mut hasher, &name, mtime_nanos(&metadata), metadata.len());
    Some(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn fold_record(hasher: &mut Sha256, path: &str, mtime: u128, size: u64) {
    hasher.update(path.as_bytes());
    hasher.update([0u8]);
    hasher.update(mtime.to_le_bytes());
    hasher.update(size.to_le_bytes());
}

fn mtime_nanos(metadata: &Metadata) -> u128 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}
