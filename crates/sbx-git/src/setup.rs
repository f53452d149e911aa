//! One-shot repository initialization for exploded projects.

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use tracing::info;

use crate::Result;

/// Default branch for new project repositories.
const DEFAULT_BRANCH: &str = "main";

/// Ignore file seeded into every new project repository. Covers the repack
/// staging area and the transient suffixes the fingerprint engine skips.
const GITIGNORE: &str = "\
# Repack staging area
_sbxcache/

# Editor droppings
*.swp
*.swo
*.tmp

# macOS
.DS_Store
";

/// Initialize `root` as a git repository with an initial commit.
///
/// Returns `false` (without touching anything) when `root` already is a
/// repository. Otherwise creates the repository with `main` as the initial
/// branch, seeds a `.gitignore`, stages everything, and commits.
pub fn init_project(root: &Path) -> Result<bool> {
    if root.join(".git").exists() {
        return Ok(false);
    }

    let mut options = RepositoryInitOptions::new();
    options.initial_head(DEFAULT_BRANCH);
    let repo = Repository::init_opts(root, &options)?;

    let gitignore = root.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, GITIGNORE).map_err(|e| crate::Error::Io {
            path: gitignore.clone(),
            source: e,
        })?;
    }

    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature = repo
        .signature()
        .or_else(|_| Signature::now("sbx", "sbx@localhost"))?;
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )?;

    info!(root = %root.display(), branch = DEFAULT_BRANCH, "initialized project repository");
    Ok(true)
}
