//! Core orchestration layer for sbx
//!
//! Owns the process-wide session state and the sync watcher that keeps a
//! project's two forms — the exploded directory tree and the sibling
//! archive — consistent as either changes on disk.
//!
//! # Architecture
//!
//! ```text
//!            CLI / status surface
//!                    |
//!                sbx-core
//!                    |
//!          +---------+---------+
//!          |                   |
//!      sbx-fs             sbx-archive
//!    (fingerprints)     (pack / unpack)
//! ```
//!
//! The watcher is the sole mutator of the session and the sole invoker of
//! pack/unpack; collaborators read snapshots and drain the action queue.

pub mod config;
pub mod detector;
pub mod error;
pub mod session;
pub mod watcher;

pub use config::Manifest;
pub use detector::{ChangeDetector, FingerprintDetector, Observation};
pub use error::{Error, Result};
pub use session::{Action, Session, SessionStatus, SharedSession};
pub use watcher::{SyncWatcher, TickOutcome, WatchRunner};
