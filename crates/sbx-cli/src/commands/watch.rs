//! Watch command: run the sync loop in the foreground.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use sbx_core::{Manifest, Session, SyncWatcher, WatchRunner};
use sbx_fs::ProjectLayout;

use crate::error::{CliError, Result};

/// How often the foreground loop drains the action queue.
const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

/// Run the watch command. Blocks until the process is interrupted.
pub fn run_watch(project: &Path, interval_ms: Option<u64>) -> Result<()> {
    if !project.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a project directory",
            project.display()
        )));
    }

    let layout = ProjectLayout::new(project);
    let mut manifest = Manifest::load(&layout)?;
    if let Some(ms) = interval_ms {
        manifest.watch.poll_interval_ms = ms;
    }
    let interval = manifest.poll_interval();

    let session = Session::shared();
    session
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .switch_project(project);

    let watcher = SyncWatcher::with_manifest(session.clone(), &manifest);
    let _runner = WatchRunner::spawn(watcher, interval).map_err(CliError::Core)?;

    println!(
        "{} Watching {} every {}ms. Press Ctrl-C to stop.",
        "=>".blue().bold(),
        layout.name().cyan(),
        interval.as_millis()
    );

    loop {
        std::thread::sleep(DRAIN_INTERVAL);
        let mut guard = session.write().unwrap_or_else(|e| e.into_inner());
        while let Some(action) = guard.take_action() {
            println!("{} {}", "sync".green().bold(), action);
        }
    }
}
