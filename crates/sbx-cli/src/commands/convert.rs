//! Break command: archive → exploded project directory.

use std::path::Path;

use colored::Colorize;

use sbx_fs::layout::ARCHIVE_EXT;

use crate::error::{CliError, Result};

/// Run the break command.
pub fn run_break(archive: &Path, dest: Option<&Path>, git: bool) -> Result<()> {
    if archive.extension().and_then(|e| e.to_str()) != Some(ARCHIVE_EXT) {
        return Err(CliError::user(format!(
            "{} is not a .{ARCHIVE_EXT} archive",
            archive.display()
        )));
    }
    if !archive.is_file() {
        return Err(CliError::user(format!(
            "{} does not exist",
            archive.display()
        )));
    }

    let default_dest = archive.with_extension("");
    let dest = dest.unwrap_or(&default_dest);

    println!(
        "{} Exploding {} into {}...",
        "=>".blue().bold(),
        archive.display().to_string().cyan(),
        dest.display().to_string().cyan()
    );

    let report = sbx_archive::unpack(archive, dest)?;
    println!(
        "{} Extracted {} entries, classified {} assets.",
        "OK".green().bold(),
        report.extracted,
        report.classified.len()
    );
    for warning in &report.warnings {
        println!("{} {}", "warning".yellow().bold(), warning);
    }

    if git {
        if sbx_git::init_project(dest)? {
            println!("{} Initialized git repository on {}.", "OK".green().bold(), "main".cyan());
        } else {
            println!("{} Existing git repository kept as-is.", "--".dimmed());
        }
    }

    println!(
        "Run {} to keep both forms in sync.",
        format!("sbx watch {}", dest.display()).cyan()
    );
    Ok(())
}
