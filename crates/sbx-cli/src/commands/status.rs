//! Status command: read-only view of a project's two forms.

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use sbx_core::{ChangeDetector, FingerprintDetector, Manifest};
use sbx_fs::ProjectLayout;

use crate::error::{CliError, Result};

/// Run the status command.
pub fn run_status(project: &Path, json_output: bool) -> Result<()> {
    if !project.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a project directory",
            project.display()
        )));
    }

    let layout = ProjectLayout::new(project);
    let manifest = Manifest::load(&layout)?;
    let detector = FingerprintDetector::new(manifest.ignore_rules());
    let observation = detector.observe(&layout).map_err(CliError::Core)?;

    let branches = sbx_git::branches(layout.root());
    let changes = sbx_git::status_short(layout.root());

    if json_output {
        let status = json!({
            "project": layout.name(),
            "root": layout.root().to_string_lossy(),
            "tree_fingerprint": observation.tree,
            "archive_fingerprint": observation.archive,
            "branches": branches,
            "changes": changes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "=>".blue().bold(),
        layout.name().bold(),
        layout.root().display()
    );
    println!(
        "   {} {}",
        "tree   ".dimmed(),
        observation.tree.as_deref().unwrap_or("absent")
    );
    println!(
        "   {} {}",
        "archive".dimmed(),
        observation.archive.as_deref().unwrap_or("absent")
    );

    if branches.is_empty() {
        println!("   {} not a git repository", "git    ".dimmed());
    } else {
        println!("   {} {}", "git    ".dimmed(), branches.join(", "));
        if changes.is_empty() {
            println!("   {} clean", "changes".dimmed());
        } else {
            for line in &changes {
                println!("   {} {}", "changes".dimmed(), line.yellow());
            }
        }
    }
    Ok(())
}
