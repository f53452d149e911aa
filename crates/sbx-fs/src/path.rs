//! Platform-stable path helpers.

use std::path::{Path, PathBuf};

/// Canonicalize a path without UNC prefixes, falling back to the input when
/// it does not exist yet.
pub fn canonicalized(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Render `path` relative to `root` with forward slashes.
///
/// Fingerprints fold these strings, so the rendering must not depend on the
/// platform separator.
pub fn relative_unix(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
