//! Change detection seam.
//!
//! The watcher's state machine only needs "what do both sides look like
//! right now"; how that answer is produced is pluggable. The default
//! implementation polls fingerprints; an event-driven implementation could
//! replace it without touching the state machine.

use sbx_fs::{IgnoreRules, ProjectLayout, fingerprint_file, fingerprint_tree};

use crate::Result;

/// One observation of both project forms. `None` means "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Fingerprint of the exploded tree
    pub tree: Option<String>,
    /// Fingerprint of the sibling archive
    pub archive: Option<String>,
}

/// Produces observations of a project's two forms.
pub trait ChangeDetector {
    /// Observe the exploded tree.
    fn observe_tree(&self, layout: &ProjectLayout) -> Result<Option<String>>;

    /// Observe the sibling archive.
    fn observe_archive(&self, layout: &ProjectLayout) -> Result<Option<String>>;

    /// Observe both sides.
    fn observe(&self, layout: &ProjectLayout) -> Result<Observation> {
        Ok(Observation {
            tree: self.observe_tree(layout)?,
            archive: self.observe_archive(layout)?,
        })
    }
}

/// Default detector: `(path, mtime, size)` fingerprints from sbx-fs.
#[derive(Debug, Default)]
pub struct FingerprintDetector {
    rules: IgnoreRules,
}

impl FingerprintDetector {
    pub fn new(rules: IgnoreRules) -> Self {
        Self { rules }
    }
}

impl ChangeDetector for FingerprintDetector {
    fn observe_tree(&self, layout: &ProjectLayout) -> Result<Option<String>> {
        Ok(fingerprint_tree(layout.root(), &self.rules)?)
    }

    fn observe_archive(&self, layout: &ProjectLayout) -> Result<Option<String>> {
        Ok(fingerprint_file(&layout.archive_path()))
    }
}
