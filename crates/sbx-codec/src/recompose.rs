//! Directory tree → document recomposition.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::escape::unescape_key;
use crate::{DOC_SUFFIX, Error, INDEX_FILE, Result};

/// Nesting ceiling for recomposition. Documents parsed out of an archive are
/// already bounded by serde_json's own recursion limit; this guards against
/// hand-built runaway trees.
const MAX_DEPTH: usize = 256;

/// Rebuild the document stored under `source`.
///
/// A file parses directly as a document (base case). A directory rebuilds as
/// an Array when it has no `index.json` and every visible entry is a file
/// named `<integer>.json` — ascending index order, and the indices must be
/// exactly `0..N` — or otherwise as an Object: `index.json` keys first in
/// stored order, then directory-derived keys in sorted listing order.
/// Hidden entries (leading `.`) are skipped.
///
/// # Errors
///
/// `MalformedTree` when the array contiguity invariant is violated or the
/// index file is not an object; `Io`/`Parse` when any entry cannot be read,
/// aborting the whole recomposition.
pub fn recompose(source: &Path) -> Result<Value> {
    let value = recompose_at(source, 0)?;
    debug!(source = %source.display(), "recomposed document");
    Ok(value)
}

fn recompose_at(path: &Path, depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(Error::malformed(path, "nesting exceeds supported depth"));
    }

    if path.is_file() {
        return read_value(path);
    }

    let entries = visible_entries(path)?;
    let has_index = entries
        .iter()
        .any(|e| e.name == INDEX_FILE && !e.is_dir);

    if !has_index && entries.iter().all(|e| !e.is_dir && integer_stem(&e.name).is_some()) {
        return recompose_array(path, &entries);
    }

    let mut map = Map::new();
    if has_index {
        match read_value(&path.join(INDEX_FILE))? {
            Value::Object(index) => map.extend(index),
            _ => {
                return Err(Error::malformed(
                    path.join(INDEX_FILE),
                    "aggregate index must be an object",
                ));
            }
        }
    }

    for entry in &entries {
        if entry.name == INDEX_FILE && !entry.is_dir {
            continue;
        }
        if entry.is_dir {
            let key = unescape_key(&entry.name);
            map.insert(key, recompose_at(&entry.path, depth + 1)?);
        } else if let Some(stem) = entry.name.strip_suffix(&format!(".{DOC_SUFFIX}")) {
            map.insert(unescape_key(stem), read_value(&entry.path)?);
        } else {
            debug!(entry = %entry.path.display(), "skipping non-document file");
        }
    }

    Ok(Value::Object(map))
}

/// Rebuild an array-shaped directory, enforcing `0..N` contiguity.
fn recompose_array(dir: &Path, entries: &[DirEntry]) -> Result<Value> {
    let mut indices: Vec<(usize, &DirEntry)> = entries
        .iter()
        .map(|e| (integer_stem(&e.name).expect("checked by caller"), e))
        .collect();
    indices.sort_by_key(|(i, _)| *i);

    for (expected, (actual, entry)) in indices.iter().enumerate() {
        if *actual != expected {
            return Err(Error::malformed(
                &entry.path,
                format!("array indices must be contiguous: expected {expected}, found {actual}"),
            ));
        }
    }

    let mut items = Vec::with_capacity(indices.len());
    for (_, entry) in indices {
        items.push(read_value(&entry.path)?);
    }
    Ok(Value::Array(items))
}

struct DirEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Directory entries minus hidden names, in sorted listing order.
fn visible_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        entries.push(DirEntry { name, path, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// `"3.json"` → `Some(3)`; anything else → `None`.
fn integer_stem(name: &str) -> Option<usize> {
    let stem = name.strip_suffix(&format!(".{DOC_SUFFIX}"))?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

fn read_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn round_trip(document: Value) -> Value {
        let dir = tempdir().unwrap();
        decompose(&document, dir.path()).unwrap();
        recompose(dir.path()).unwrap()
    }

    #[test]
    fn nested_document_round_trips() {
        let document = json!({
            "a": 1,
            "b": [10, 20],
            "c": {"d": "x/y"}
        });
        assert_eq!(round_trip(document.clone()), document);
    }

    #[test]
    fn escaped_keys_are_recovered_exactly() {
        let document = json!({"a/b": {"deep": true}, "plain": 1});
        assert_eq!(round_trip(document.clone()), document);
    }

    #[test]
    fn array_elements_keep_index_order() {
        // Ten elements so lexicographic and numeric file ordering disagree.
        let items: Vec<Value> = (0..12).map(Value::from).collect();
        let document = json!({"list": items});
        assert_eq!(round_trip(document.clone()), document);
    }

    #[test]
    fn arrays_of_objects_round_trip() {
        let document = json!({"targets": [{"name": "Stage"}, {"name": "Sprite1"}]});
        assert_eq!(round_trip(document.clone()), document);
    }

    #[test]
    fn empty_object_and_empty_array_stay_distinct() {
        let document = json!({"obj": {}, "arr": []});
        assert_eq!(round_trip(document.clone()), document);
    }

    #[test]
    fn index_keys_come_before_directory_keys() {
        let dir = tempdir().unwrap();
        decompose(&json!({"z": 1, "a": {"x": 2}}), dir.path()).unwrap();
        let rebuilt = recompose(dir.path()).unwrap();

        let keys: Vec<&String> = rebuilt.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn array_gap_is_malformed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.json"), "10").unwrap();
        fs::write(dir.path().join("1.json"), "20").unwrap();
        fs::write(dir.path().join("3.json"), "40").unwrap();

        let err = recompose(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedTree { .. }), "got {err:?}");
    }

    #[test]
    fn single_file_parses_directly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("value.json");
        fs::write(&path, "{\"k\": [1, 2]}").unwrap();
        assert_eq!(recompose(&path).unwrap(), json!({"k": [1, 2]}));
    }

    #[test]
    fn hand_written_leaf_files_become_keys() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.json"), "{\"a\": 1}").unwrap();
        fs::write(dir.path().join("a%2Fb.json"), "\"slash\"").unwrap();

        let rebuilt = recompose(dir.path()).unwrap();
        assert_eq!(rebuilt, json!({"a": 1, "a/b": "slash"}));
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let dir = tempdir().unwrap();
        decompose(&json!({"a": 1}), dir.path()).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();

        assert_eq!(recompose(dir.path()).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn mixed_integer_and_named_entries_rebuild_as_object() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.json"), "1").unwrap();
        fs::write(dir.path().join("name.json"), "2").unwrap();

        assert_eq!(recompose(dir.path()).unwrap(), json!({"0": 1, "name": 2}));
    }

    #[test]
    fn unreadable_content_aborts_recomposition() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.json"), "not json").unwrap();
        let err = recompose(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn runaway_nesting_is_rejected() {
        let dir = tempdir().unwrap();
        let mut path = dir.path().to_path_buf();
        for _ in 0..(MAX_DEPTH + 2) {
            path.push("d");
        }
        fs::create_dir_all(&path).unwrap();

        let err = recompose(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedTree { .. }));
    }
}
