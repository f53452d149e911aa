//! Per-project configuration manifest.
//!
//! Projects may carry a `.sbx/config.toml` tuning the watcher and the
//! classifier. Every field has a default; a missing file means an
//! all-default manifest.

use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sbx_archive::DEFAULT_SHORT_AUDIO_SECS;
use sbx_fs::{IgnoreRules, ProjectLayout};

use crate::{Error, Result};

/// Default watcher poll interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Floor for configured poll intervals; anything shorter just burns I/O.
const MIN_POLL_INTERVAL_MS: u64 = 100;

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_short_audio_secs() -> f64 {
    DEFAULT_SHORT_AUDIO_SECS
}

/// Watcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSection {
    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Asset classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifySection {
    /// Audio at or below this many seconds is a sound effect, above it music
    #[serde(default = "default_short_audio_secs")]
    pub short_audio_secs: f64,
}

impl Default for ClassifySection {
    fn default() -> Self {
        Self {
            short_audio_secs: default_short_audio_secs(),
        }
    }
}

/// Ignore-rule extensions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreSection {
    /// Extra transient suffixes, added to the built-in defaults
    #[serde(default)]
    pub suffixes: Vec<String>,
}

/// Project configuration parsed from `.sbx/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Watcher settings
    #[serde(default)]
    pub watch: WatchSection,

    /// Asset classifier settings
    #[serde(default)]
    pub classify: ClassifySection,

    /// Ignore-rule extensions
    #[serde(default)]
    pub ignore: IgnoreSection,
}

impl Manifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(content).map_err(|e| Error::InvalidConfig {
                message: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load the manifest for a project, defaulting when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let path = layout.config_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| Error::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    /// Watcher poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watch.poll_interval_ms)
    }

    /// Effective ignore rules: defaults plus configured extra suffixes.
    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::default().with_extra_suffixes(&self.ignore.suffixes)
    }

    fn validate(&self) -> Result<()> {
        if self.watch.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(Error::InvalidConfig {
                message: format!(
                    "watch.poll_interval_ms too short: {} < {}",
                    self.watch.poll_interval_ms, MIN_POLL_INTERVAL_MS
                ),
            });
        }
        if !self.classify.short_audio_secs.is_finite() || self.classify.short_audio_secs < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "classify.short_audio_secs must be a non-negative number, got {}",
                    self.classify.short_audio_secs
                ),
            });
        }
        Ok(())
    }
}
