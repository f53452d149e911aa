//! Read-only branch and status queries for the status surface.
//!
//! Both queries return empty lists for directories that are not git
//! repositories; a project without version control is not an error.

use std::path::Path;

use git2::{BranchType, Repository, Status, StatusOptions};

/// Local branch names of the repository at `root`.
pub fn branches(root: &Path) -> Vec<String> {
    let Ok(repo) = Repository::open(root) else {
        return Vec::new();
    };
    let Ok(branches) = repo.branches(Some(BranchType::Local)) else {
        return Vec::new();
    };
    branches
        .filter_map(|item| {
            let (branch, _) = item.ok()?;
            branch.name().ok().flatten().map(String::from)
        })
        .collect()
}

/// Porcelain-style `<flags> <path>` lines for every changed or untracked
/// file at `root`.
pub fn status_short(root: &Path) -> Vec<String> {
    let Ok(repo) = Repository::open(root) else {
        return Vec::new();
    };
    let mut options = StatusOptions::new();
    options.include_untracked(true).recurse_untracked_dirs(true);
    let Ok(statuses) = repo.statuses(Some(&mut options)) else {
        return Vec::new();
    };
    statuses
        .iter()
        .filter_map(|entry| {
            let path = entry.path()?.to_string();
            Some(format!("{} {}", status_flags(entry.status()), path))
        })
        .collect()
}

fn status_flags(status: Status) -> &'static str {
    if status.intersects(Status::WT_NEW | Status::INDEX_NEW) {
        "??"
    } else if status.intersects(Status::WT_DELETED | Status::INDEX_DELETED) {
        " D"
    } else if status.intersects(Status::WT_RENAMED | Status::INDEX_RENAMED) {
        " R"
    } else {
        " M"
    }
}
