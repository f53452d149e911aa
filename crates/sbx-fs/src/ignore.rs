//! Ignore rules shared by fingerprinting and tree clearing.
//!
//! The defaults exclude version-control metadata, the repack staging area,
//! and editor/droppings that change without the project changing.

/// Names and suffixes excluded from fingerprinting and tree walks.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    dirs: Vec<String>,
    suffixes: Vec<String>,
    files: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            dirs: vec![".git".into(), ".sbx".into(), "_sbxcache".into()],
            suffixes: vec![".tmp".into(), ".swp".into(), ".swo".into(), "~".into()],
            files: vec![".DS_Store".into()],
        }
    }
}

impl IgnoreRules {
    /// Extend the default suffix set, e.g. from per-project configuration.
    pub fn with_extra_suffixes(mut self, suffixes: &[String]) -> Self {
        for suffix in suffixes {
            if !self.suffixes.contains(suffix) {
                self.suffixes.push(suffix.clone());
            }
        }
        self
    }

    /// Whether a directory with this name is pruned from walks.
    pub fn ignores_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d == name)
    }

    /// Whether a file with this name is excluded.
    pub fn ignores_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}
