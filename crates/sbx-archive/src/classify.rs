//! Extension/duration asset classification.
//!
//! Category assignment is a deterministic function of the file extension
//! plus, for audio, a duration threshold. Re-running classification on an
//! already-classified tree moves nothing: only files sitting directly at the
//! project root are candidates.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use sbx_fs::{IgnoreRules, ProjectLayout, ProjectPath};

use crate::{Error, Result};

/// Audio at or below this many seconds is a sound effect, above it music.
pub const DEFAULT_SHORT_AUDIO_SECS: f64 = 5.0;

/// Asset categories, each mapping to a directory under `assets/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Bitmap images (png, jpg, jpeg)
    Raster,
    /// Vector images (svg)
    Vector,
    /// Short audio: sound effects at or below the duration threshold
    Audio,
    /// Long audio: background music above the duration threshold
    Bgm,
    /// Fonts (ttf, otf, woff, woff2)
    Font,
    /// Everything else
    Other,
}

impl AssetCategory {
    /// All categories, in the order `pack` flattens them back.
    pub const ALL: [AssetCategory; 6] = [
        Self::Raster,
        Self::Vector,
        Self::Audio,
        Self::Bgm,
        Self::Font,
        Self::Other,
    ];

    /// Directory name under `assets/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Vector => "vector",
            Self::Audio => "audio",
            Self::Bgm => "bgm",
            Self::Font => "font",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Pluggable audio duration measurement.
///
/// The sync core only needs *some* deterministic answer; implementations may
/// parse headers, shell out, or consult a cache. Failure is never fatal —
/// the classifier falls back to the short-audio bucket.
pub trait DurationProbe {
    /// Duration of the audio file at `path` in seconds.
    fn duration_secs(&self, path: &Path) -> Result<f64>;
}

/// Report of one classification pass.
#[derive(Debug, Default)]
pub struct ClassifyReport {
    /// Files moved, as `(file name, category)`.
    pub moved: Vec<(String, AssetCategory)>,
    /// Non-fatal classification warnings.
    pub warnings: Vec<String>,
}

/// Classify one file by extension and, for audio, probed duration.
///
/// A failed probe logs a warning into `warnings` and defaults to the short
/// audio bucket.
pub fn classify_file(
    path: &Path,
    probe: &dyn DurationProbe,
    threshold_secs: f64,
    warnings: &mut Vec<String>,
) -> AssetCategory {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" | "jpg" | "jpeg" => AssetCategory::Raster,
        "svg" => AssetCategory::Vector,
        "wav" | "mp3" | "ogg" => match probe.duration_secs(path) {
            Ok(secs) if secs > threshold_secs => AssetCategory::Bgm,
            Ok(_) => AssetCategory::Audio,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "duration unknown, using short-audio bucket");
                warnings.push(format!("unknown duration for {}: {e}", path.display()));
                AssetCategory::Audio
            }
        },
        "ttf" | "otf" | "woff" | "woff2" => AssetCategory::Font,
        _ => AssetCategory::Other,
    }
}

/// Move every loose file at the project root into `assets/<category>`.
///
/// The document entry, hidden files, and transient files are left alone.
/// Files already under `assets/` are not candidates, so a second pass over a
/// classified tree is a no-op.
pub fn sort_assets(
    layout: &ProjectLayout,
    probe: &dyn DurationProbe,
    threshold_secs: f64,
) -> Result<ClassifyReport> {
    let rules = IgnoreRules::default();
    let mut report = ClassifyReport::default();

    for category in AssetCategory::ALL {
        let dir = layout.asset_category_dir(category.dir_name());
        fs::create_dir_all(&dir).map_err(|e| Error::io(dir, e))?;
    }

    let root = layout.root();
    for entry in fs::read_dir(root).map_err(|e| Error::io(root, e))? {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == ProjectPath::DocumentEntry.as_str()
            || name.starts_with('.')
            || rules.ignores_file(&name)
        {
            continue;
        }

        let category = classify_file(&path, probe, threshold_secs, &mut report.warnings);
        let dest = layout.asset_category_dir(category.dir_name()).join(&name);
        fs::rename(&path, &dest).map_err(|e| Error::io(&path, e))?;
        debug!(file = %name, category = %category, "classified asset");
        report.moved.push((name, category));
    }

    Ok(report)
}
