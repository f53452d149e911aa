//! Process-wide session state.
//!
//! One session tracks one active project: its location, the fingerprints
//! observed on the previous watcher tick, and the queue of pending actions
//! for external collaborators. The watcher is the sole mutator; everyone
//! else reads snapshots via [`Session::status`] and drains the queue one
//! entry at a time via [`Session::take_action`].

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use sbx_fs::ProjectLayout;

/// Session shared between the watcher thread and read-only collaborators.
pub type SharedSession = Arc<RwLock<Session>>;

/// Opaque action tokens consumed by external collaborators.
///
/// Only `reload` is defined: state was just propagated between the two
/// forms and views should be re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Reload,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only snapshot of a session for status surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    /// Project name, when a project is active
    pub project: Option<String>,
    /// Project root path
    pub root: Option<String>,
    /// Tree fingerprint observed on the last tick
    pub tree_fingerprint: Option<String>,
    /// Archive fingerprint observed on the last tick
    pub archive_fingerprint: Option<String>,
    /// Number of queued actions not yet drained
    pub pending_actions: usize,
}

/// Mutable sync state for the active project.
#[derive(Debug, Default)]
pub struct Session {
    project: Option<ProjectLayout>,
    pub(crate) tree_fingerprint: Option<String>,
    pub(crate) archive_fingerprint: Option<String>,
    actions: VecDeque<Action>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh session for sharing with a watcher thread.
    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(Self::new()))
    }

    /// The active project, if any.
    pub fn project(&self) -> Option<&ProjectLayout> {
        self.project.as_ref()
    }

    /// Activate the project at `root`.
    ///
    /// Prior fingerprints and queued actions are reset in the same call, so
    /// the next tick seeds fresh state instead of misreading the new
    /// project's initial condition as a change.
    pub fn switch_project(&mut self, root: impl AsRef<Path>) {
        self.project = Some(ProjectLayout::new(root.as_ref()));
        self.tree_fingerprint = None;
        self.archive_fingerprint = None;
        self.actions.clear();
    }

    /// Deactivate the current project and drop all dependent state.
    pub fn close_project(&mut self) {
        self.project = None;
        self.tree_fingerprint = None;
        self.archive_fingerprint = None;
        self.actions.clear();
    }

    /// Queue an action for external collaborators.
    pub(crate) fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    /// Remove and return at most one queued action.
    pub fn take_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    /// Snapshot for status surfaces. Values may be stale by the time the
    /// caller looks at them; that is the contract.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            project: self.project.as_ref().map(|p| p.name()),
            root: self
                .project
                .as_ref()
                .map(|p| p.root().to_string_lossy().into_owned()),
            tree_fingerprint: self.tree_fingerprint.clone(),
            archive_fingerprint: self.archive_fingerprint.clone(),
            pending_actions: self.actions.len(),
        }
    }
}
