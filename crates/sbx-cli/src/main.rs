//! sbx CLI
//!
//! The command-line interface for converting project archives to exploded
//! trees and keeping the two forms in sync.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} dual-form project manager", "sbx".green().bold());
            println!();
            println!("Run {} for available commands.", "sbx --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Break { archive, dest, git } => commands::run_break(&archive, dest.as_deref(), git),
        Commands::Build { project } => commands::run_build(&project),
        Commands::Watch {
            project,
            interval_ms,
        } => commands::run_watch(&project, interval_ms),
        Commands::Status { project, json } => commands::run_status(&project, json),
    }
}
