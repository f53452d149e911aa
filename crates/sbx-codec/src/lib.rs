//! Structural codec for sbx
//!
//! Decomposes a JSON document into a version-control-friendly directory tree
//! and recomposes it losslessly:
//!
//! - an Object becomes a directory; its scalar-valued keys are aggregated
//!   into one `index.json` file, composite-valued keys become subdirectories
//!   named by the percent-escaped key
//! - an Array becomes a directory of `0.json .. N-1.json` element files,
//!   each holding the element serialized whole
//!
//! The codec is additive/overwriting: callers clear stale trees before
//! decomposing.

pub mod decompose;
pub mod error;
pub mod escape;
pub mod recompose;

pub use decompose::decompose;
pub use error::{Error, Result};
pub use escape::{escape_key, unescape_key};
pub use recompose::recompose;

/// File suffix shared by the document entry and every file the codec writes.
pub const DOC_SUFFIX: &str = "json";

/// Name of the aggregate index file holding an Object's scalar-valued keys.
pub const INDEX_FILE: &str = "index.json";
