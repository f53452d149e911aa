//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sbx - keep a project archive and its exploded directory tree in sync
#[derive(Parser, Debug)]
#[command(name = "sbx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Explode an archive into a version-control-friendly project directory
    ///
    /// Extracts the archive, sorts assets into typed subdirectories, and
    /// explodes the document entry into src/.
    ///
    /// Examples:
    ///   sbx break demo.sb3              # Explode next to the archive
    ///   sbx break demo.sb3 ~/proj/demo  # Explode to a specific directory
    ///   sbx break demo.sb3 --git        # Also initialize a git repository
    Break {
        /// Path to the project archive
        archive: PathBuf,

        /// Destination directory (defaults to the archive path minus its extension)
        dest: Option<PathBuf>,

        /// Initialize a git repository with an initial commit
        #[arg(long)]
        git: bool,
    },

    /// Rebuild the archive from an exploded project directory
    Build {
        /// Path to the exploded project directory
        project: PathBuf,
    },

    /// Watch an exploded project and keep both forms in sync
    ///
    /// Polls fingerprints of the tree and the archive; whichever side
    /// changed is propagated to the other. Runs until interrupted.
    Watch {
        /// Path to the exploded project directory
        project: PathBuf,

        /// Poll interval in milliseconds (overrides project config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Show project state: fingerprints, branches, and dirty files
    Status {
        /// Path to the exploded project directory
        project: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
