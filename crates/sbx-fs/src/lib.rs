//! Filesystem layer for sbx
//!
//! Provides the canonical project layout, the default ignore rules, and the
//! change-detection fingerprint engine shared by the archive adapter and the
//! sync watcher.

pub mod error;
pub mod fingerprint;
pub mod ignore;
pub mod io;
pub mod layout;
pub mod path;

pub use error::{Error, Result};
pub use fingerprint::{fingerprint_file, fingerprint_tree};
pub use ignore::IgnoreRules;
pub use layout::{ProjectLayout, ProjectPath};
pub use path::{canonicalized, relative_unix};
