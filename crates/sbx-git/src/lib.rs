//! Git collaborator for sbx projects
//!
//! Exploded projects are ordinary git repositories. This crate owns the two
//! touch points the rest of the system needs: turning a freshly exploded
//! project into a repository, and the read-only branch/status queries the
//! status surface shows.

pub mod error;
pub mod query;
pub mod setup;

pub use error::{Error, Result};
pub use query::{branches, status_short};
pub use setup::init_project;
