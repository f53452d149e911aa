//! Document → directory tree decomposition.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::escape::escape_key;
use crate::{DOC_SUFFIX, Error, INDEX_FILE, Result};

/// Write `document` under `dest` such that [`crate::recompose`] recovers a
/// deeply equal document.
///
/// The root must be an Object or an Array. Scalar-valued keys (including
/// empty objects and arrays, so `{}` and `[]` stay distinguishable) land in
/// the level's `index.json`; composite-valued keys become subdirectories
/// named by the percent-escaped key. Array elements are written whole as
/// `<index>.json` files.
///
/// Existing content under `dest` is overwritten but not reconciled; callers
/// clear stale trees first.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be written. A failed
/// write aborts the whole decomposition.
pub fn decompose(document: &Value, dest: &Path) -> Result<()> {
    if !document.is_object() && !document.is_array() {
        return Err(Error::UnsupportedDocument {
            message: "document root must be an object or an array".to_string(),
        });
    }

    // Explicit work stack; document depth must not become call depth.
    let mut stack: Vec<(&Value, PathBuf)> = vec![(document, dest.to_path_buf())];

    while let Some((value, dir)) = stack.pop() {
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        match value {
            Value::Object(map) => {
                let mut index = Map::new();
                for (key, child) in map {
                    if is_index_leaf(child) {
                        index.insert(key.clone(), child.clone());
                    } else {
                        stack.push((child, dir.join(escape_key(key))));
                    }
                }
                // Written even when empty: a directory with an index file is
                // an Object, a directory without one is an Array.
                write_value(&dir.join(INDEX_FILE), &Value::Object(index))?;
            }
            Value::Array(items) => {
                for (position, element) in items.iter().enumerate() {
                    write_value(&dir.join(format!("{position}.{DOC_SUFFIX}")), element)?;
                }
            }
            // Only composites are ever pushed.
            _ => unreachable!("scalar on decompose stack"),
        }
    }

    debug!(dest = %dest.display(), "decomposed document");
    Ok(())
}

/// Scalars plus empty composites are stored in the aggregate index.
fn is_index_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

fn write_value(path: &Path, value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, rendered).map_err(|e| Error::io(path, e))
}
