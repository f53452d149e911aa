//! Canonical on-disk layout of an exploded project.
//!
//! A project lives in two forms: the exploded directory tree rooted at
//! `ProjectLayout::root` and the sibling archive at
//! `ProjectLayout::archive_path`. All well-known names are centralized here
//! so the codec, the archive adapter, and the watcher agree on them.

use std::path::{Path, PathBuf};

use crate::path::canonicalized;

/// File extension of the project archive.
pub const ARCHIVE_EXT: &str = "sb3";

/// Well-known names inside an exploded project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The `src` directory (exploded document tree)
    SrcDir,
    /// The `assets` directory (classified media files)
    AssetsDir,
    /// The `_sbxcache` directory (transient repack staging area)
    StagingDir,
    /// The `.sbx` directory (per-project configuration root)
    ConfigDir,
    /// The `project.json` archive entry (the document)
    DocumentEntry,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SrcDir => "src",
            Self::AssetsDir => "assets",
            Self::StagingDir => "_sbxcache",
            Self::ConfigDir => ".sbx",
            Self::DocumentEntry => "project.json",
        }
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path helpers for one exploded project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Create a layout rooted at `root`.
    ///
    /// The root is canonicalized when it exists; a not-yet-created root is
    /// kept as given so layouts can be built ahead of `unpack`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: canonicalized(root.as_ref()),
        }
    }

    /// The project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The project name (the root directory's file name).
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.to_string_lossy().into_owned())
    }

    /// The exploded document tree, `<root>/src`.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join(ProjectPath::SrcDir.as_str())
    }

    /// The classified assets root, `<root>/assets`.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ProjectPath::AssetsDir.as_str())
    }

    /// One category directory under assets, e.g. `<root>/assets/raster`.
    pub fn asset_category_dir(&self, category: &str) -> PathBuf {
        self.assets_dir().join(category)
    }

    /// The transient repack staging area, `<root>/_sbxcache`.
    ///
    /// Never a source of truth; excluded from fingerprinting by the default
    /// ignore rules and recreated on every pack.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(ProjectPath::StagingDir.as_str())
    }

    /// The per-project configuration file, `<root>/.sbx/config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.root
            .join(ProjectPath::ConfigDir.as_str())
            .join("config.toml")
    }

    /// The document entry as extracted at the project root.
    ///
    /// Only exists transiently during `unpack`; it is deleted once the
    /// document has been exploded into `src`.
    pub fn document_entry(&self) -> PathBuf {
        self.root.join(ProjectPath::DocumentEntry.as_str())
    }

    /// The sibling archive path, `<root>.sb3`.
    pub fn archive_path(&self) -> PathBuf {
        self.root.with_extension(ARCHIVE_EXT)
    }
}
