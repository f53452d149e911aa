//! Sync watcher: the polling state machine that reconciles the two forms.
//!
//! One background thread per session runs [`SyncWatcher::tick`] at a fixed
//! interval. The watcher is the sole mutator of the session and the sole
//! invoker of pack/unpack; mutual exclusion comes from having exactly one
//! writer, not from locking around the filesystem operations.

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use sbx_archive::{WavProbe, pack, unpack_with};
use sbx_fs::ProjectLayout;

use crate::config::Manifest;
use crate::detector::{ChangeDetector, FingerprintDetector, Observation};
use crate::session::{Action, Session, SharedSession};
use crate::{Error, Result};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No active project
    Idle,
    /// Fingerprints observed, nothing to propagate
    Unchanged,
    /// The tree changed; the archive was rebuilt from it
    RepackedArchive,
    /// The archive changed; the tree was rebuilt from it
    RebuiltTree,
    /// Observation or propagation failed; priors untouched, retried next tick
    Abandoned,
}

/// Polling reconciler between the exploded tree and the archive.
pub struct SyncWatcher {
    session: SharedSession,
    detector: Box<dyn ChangeDetector + Send>,
    short_audio_secs: f64,
}

impl SyncWatcher {
    /// Watcher with the default fingerprint detector and classifier settings.
    pub fn new(session: SharedSession) -> Self {
        Self::with_manifest(session, &Manifest::default())
    }

    /// Watcher configured from a project manifest.
    pub fn with_manifest(session: SharedSession, manifest: &Manifest) -> Self {
        Self {
            session,
            detector: Box::new(FingerprintDetector::new(manifest.ignore_rules())),
            short_audio_secs: manifest.classify.short_audio_secs,
        }
    }

    /// Substitute the change detector, keeping the state machine intact.
    pub fn with_detector(mut self, detector: Box<dyn ChangeDetector + Send>) -> Self {
        self.detector = detector;
        self
    }

    /// The session this watcher drives.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Run one reconciliation step.
    ///
    /// When both sides changed within the same interval, the tree wins and
    /// overwrites the archive — a deliberate precedence (text and asset
    /// edits are the expensive ones to lose), not an error condition.
    ///
    /// Failures are logged and the tick abandoned without updating prior
    /// fingerprints, so the same change is retried next tick; a tick can
    /// never take the loop down.
    pub fn tick(&self) -> TickOutcome {
        let (layout, prior_tree, prior_archive) = {
            let session = read_lock(&self.session);
            let Some(layout) = session.project().cloned() else {
                return TickOutcome::Idle;
            };
            (
                layout,
                session.tree_fingerprint.clone(),
                session.archive_fingerprint.clone(),
            )
        };

        let observation = match self.detector.observe(&layout) {
            Ok(observation) => observation,
            Err(e) => {
                warn!(project = %layout.name(), error = %e, "observation failed, abandoning tick");
                return TickOutcome::Abandoned;
            }
        };

        if prior_tree.is_some() && prior_tree != observation.tree {
            self.propagate_tree_edit(&layout, observation)
        } else if prior_archive.is_some() && prior_archive != observation.archive {
            self.propagate_archive_edit(&layout, observation)
        } else {
            self.store(&layout, observation, None);
            TickOutcome::Unchanged
        }
    }

    /// Tree changed: rebuild the archive, then re-observe the archive so the
    /// write we just caused is not misread as an external edit next tick.
    fn propagate_tree_edit(&self, layout: &ProjectLayout, observation: Observation) -> TickOutcome {
        info!(project = %layout.name(), "tree changed, rebuilding archive");
        if let Err(e) = pack(layout.root()) {
            warn!(project = %layout.name(), error = %e, "pack failed, will retry next tick");
            return TickOutcome::Abandoned;
        }
        let archive = match self.detector.observe_archive(layout) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                warn!(project = %layout.name(), error = %e, "post-pack observation failed");
                return TickOutcome::Abandoned;
            }
        };
        self.store(
            layout,
            Observation {
                tree: observation.tree,
                archive,
            },
            Some(Action::Reload),
        );
        TickOutcome::RepackedArchive
    }

    /// Archive changed externally: clear the derived state and re-unpack,
    /// then re-observe the tree for the same feedback-loop reason.
    fn propagate_archive_edit(
        &self,
        layout: &ProjectLayout,
        observation: Observation,
    ) -> TickOutcome {
        info!(project = %layout.name(), "archive changed, rebuilding tree");
        if let Err(e) = self.rebuild_tree(layout) {
            warn!(project = %layout.name(), error = %e, "unpack failed, will retry next tick");
            return TickOutcome::Abandoned;
        }
        let tree = match self.detector.observe_tree(layout) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                warn!(project = %layout.name(), error = %e, "post-unpack observation failed");
                return TickOutcome::Abandoned;
            }
        };
        self.store(
            layout,
            Observation {
                tree,
                archive: observation.archive,
            },
            Some(Action::Reload),
        );
        TickOutcome::RebuiltTree
    }

    fn rebuild_tree(&self, layout: &ProjectLayout) -> Result<()> {
        for dir in [layout.src_dir(), layout.assets_dir(), layout.staging_dir()] {
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(Error::Io)?;
            }
        }
        unpack_with(
            &layout.archive_path(),
            layout.root(),
            &WavProbe,
            self.short_audio_secs,
        )?;
        Ok(())
    }

    fn store(&self, layout: &ProjectLayout, observation: Observation, action: Option<Action>) {
        let mut session = write_lock(&self.session);
        // A project switch between snapshot and store makes this tick stale.
        if session.project().map(ProjectLayout::root) != Some(layout.root()) {
            debug!(project = %layout.name(), "project switched mid-tick, dropping observation");
            return;
        }
        session.tree_fingerprint = observation.tree;
        session.archive_fingerprint = observation.archive;
        if let Some(action) = action {
            session.enqueue(action);
        }
    }
}

/// Background thread driving a watcher at a fixed interval.
pub struct WatchRunner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WatchRunner {
    /// Spawn the poll loop.
    pub fn spawn(watcher: SyncWatcher, interval: Duration) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("sbx-watch".to_string())
            .spawn(move || {
                info!(interval_ms = interval.as_millis() as u64, "watch loop started");
                while !flag.load(Ordering::Relaxed) {
                    let outcome = watcher.tick();
                    debug!(?outcome, "tick");
                    std::thread::sleep(interval);
                }
                info!("watch loop stopped");
            })
            .map_err(Error::Io)?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the loop to stop and wait for the thread to finish.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WatchRunner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn read_lock(session: &SharedSession) -> RwLockReadGuard<'_, Session> {
    session.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(session: &SharedSession) -> RwLockWriteGuard<'_, Session> {
    session
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    fn explode_project(root: &Path, count: i64) {
        sbx_codec::decompose(
            &json!({"name": "demo", "count": count}),
            &root.join("src"),
        )
        .unwrap();
    }

    fn watcher_for(root: &Path) -> SyncWatcher {
        let session = Session::shared();
        session.write().unwrap().switch_project(root);
        SyncWatcher::new(session)
    }

    fn queued_actions(watcher: &SyncWatcher) -> usize {
        watcher.session().read().unwrap().status().pending_actions
    }

    #[test]
    fn tick_without_project_is_idle() {
        let watcher = SyncWatcher::new(Session::shared());
        assert_eq!(watcher.tick(), TickOutcome::Idle);
    }

    #[test]
    fn first_tick_seeds_priors_without_propagating() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let watcher = watcher_for(&root);
        assert_eq!(watcher.tick(), TickOutcome::Unchanged);

        let status = watcher.session().read().unwrap().status();
        assert!(status.tree_fingerprint.is_some());
        assert!(status.archive_fingerprint.is_none());
        assert_eq!(status.pending_actions, 0);
    }

    #[test]
    fn tree_edit_repacks_exactly_once() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let watcher = watcher_for(&root);
        assert_eq!(watcher.tick(), TickOutcome::Unchanged);

        fs::write(
            root.join("src/index.json"),
            r#"{"name": "demo", "count": 2, "touched": true}"#,
        )
        .unwrap();

        assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);
        let archive = root.with_extension("sb3");
        assert!(archive.is_file());
        assert_eq!(queued_actions(&watcher), 1);

        // No external edits: later ticks must not repack again.
        for _ in 0..4 {
            assert_eq!(watcher.tick(), TickOutcome::Unchanged);
        }
        assert_eq!(queued_actions(&watcher), 1);
    }

    #[test]
    fn external_archive_edit_rebuilds_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let watcher = watcher_for(&root);
        watcher.tick();
        fs::write(root.join("src/index.json"), r#"{"count": 2}"#).unwrap();
        assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);

        // Someone replaces the archive with a different project state.
        let other = dir.path().join("other");
        explode_project(&other, 99);
        let bytes = sbx_archive::pack_bytes(&other).unwrap();
        fs::write(root.with_extension("sb3"), bytes).unwrap();

        assert_eq!(watcher.tick(), TickOutcome::RebuiltTree);
        let rebuilt = sbx_codec::recompose(&root.join("src")).unwrap();
        assert_eq!(rebuilt["count"], json!(99));

        assert_eq!(watcher.tick(), TickOutcome::Unchanged);
    }

    #[test]
    fn simultaneous_edits_prefer_the_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let watcher = watcher_for(&root);
        watcher.tick();
        fs::write(root.join("src/index.json"), r#"{"count": 2}"#).unwrap();
        assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);

        // Both sides change within one interval.
        fs::write(root.join("src/index.json"), r#"{"count": 3}"#).unwrap();
        let other = dir.path().join("other");
        explode_project(&other, 99);
        fs::write(
            root.with_extension("sb3"),
            sbx_archive::pack_bytes(&other).unwrap(),
        )
        .unwrap();

        assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);

        // The archive now carries the tree's state, not the external one.
        let unpacked = dir.path().join("check");
        sbx_archive::unpack(&root.with_extension("sb3"), &unpacked).unwrap();
        let document = sbx_codec::recompose(&unpacked.join("src")).unwrap();
        assert_eq!(document["count"], json!(3));
    }

    #[test]
    fn failed_pack_abandons_tick_and_retries() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let watcher = watcher_for(&root);
        watcher.tick();
        let seeded = watcher
            .session()
            .read()
            .unwrap()
            .status()
            .tree_fingerprint
            .clone();

        // Breaking the tree makes the fingerprint change and pack fail.
        fs::remove_dir_all(root.join("src")).unwrap();
        assert_eq!(watcher.tick(), TickOutcome::Abandoned);
        assert_eq!(watcher.tick(), TickOutcome::Abandoned);

        let status = watcher.session().read().unwrap().status();
        assert_eq!(status.tree_fingerprint, seeded, "priors must survive a failed tick");
        assert_eq!(status.pending_actions, 0);

        // Restoring the tree lets the retry succeed.
        explode_project(&root, 4);
        assert_eq!(watcher.tick(), TickOutcome::RepackedArchive);
    }

    /// Detector that always fails, standing in for unreadable storage.
    struct FailingDetector;

    impl ChangeDetector for FailingDetector {
        fn observe_tree(&self, layout: &ProjectLayout) -> crate::Result<Option<String>> {
            Err(Error::Io(std::io::Error::other(format!(
                "storage unavailable under {}",
                layout.root().display()
            ))))
        }

        fn observe_archive(&self, _layout: &ProjectLayout) -> crate::Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn failed_observation_abandons_the_tick() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let session = Session::shared();
        session.write().unwrap().switch_project(&root);
        let watcher = SyncWatcher::new(session).with_detector(Box::new(FailingDetector));

        assert_eq!(watcher.tick(), TickOutcome::Abandoned);
        let status = watcher.session().read().unwrap().status();
        assert!(status.tree_fingerprint.is_none(), "priors must stay unset");
    }

    #[test]
    fn runner_stops_cleanly() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("demo");
        explode_project(&root, 1);

        let session = Session::shared();
        session.write().unwrap().switch_project(&root);
        let watcher = SyncWatcher::new(Arc::clone(&session));
        let runner = WatchRunner::spawn(watcher, Duration::from_millis(10)).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        runner.stop();

        let status = session.read().unwrap().status();
        assert!(status.tree_fingerprint.is_some(), "loop never ticked");
    }
}
