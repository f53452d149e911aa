//! Archive adapter for sbx
//!
//! Converts between the single-file project archive (a zip holding one
//! `project.json` document plus asset files at its root) and the exploded
//! project directory: document under `src/`, assets classified into typed
//! subdirectories under `assets/`.

pub mod classify;
pub mod error;
pub mod pack;
pub mod probe;
pub mod unpack;

pub use classify::{
    AssetCategory, ClassifyReport, DEFAULT_SHORT_AUDIO_SECS, DurationProbe, classify_file,
    sort_assets,
};
pub use error::{Error, Result};
pub use pack::{pack, pack_bytes};
pub use probe::WavProbe;
pub use unpack::{UnpackReport, unpack, unpack_with};
