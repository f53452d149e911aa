//! Build command: exploded project directory → archive.

use std::path::Path;

use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the build command.
pub fn run_build(project: &Path) -> Result<()> {
    if !project.join("src").is_dir() {
        return Err(CliError::user(format!(
            "{} has no src/ tree to rebuild from",
            project.display()
        )));
    }

    println!(
        "{} Rebuilding archive for {}...",
        "=>".blue().bold(),
        project.display().to_string().cyan()
    );

    let archive = sbx_archive::pack(project)?;
    println!(
        "{} Archive written to {}.",
        "OK".green().bold(),
        archive.display().to_string().cyan()
    );
    Ok(())
}
