//! [`TestProject`] builder for sbx test scenarios.
//!
//! Builds throwaway project directories and real zip archive fixtures so
//! tests across the workspace exercise the same shapes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A temporary workspace directory with helper methods for building archive
/// and tree fixtures.
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path for a file or directory relative to the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write_file(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// A small document in the shape real project archives carry.
    pub fn sample_document() -> Value {
        json!({
            "targets": [
                {"isStage": true, "name": "Stage", "volume": 100},
                {"isStage": false, "name": "Sprite1", "x": 24, "y": -8}
            ],
            "monitors": [],
            "extensions": [],
            "meta": {"semver": "3.0.0", "agent": "sbx"}
        })
    }

    /// Build a real zip archive at `<root>/<name>` with the given document
    /// as its `project.json` entry plus asset files at the archive root.
    pub fn write_archive(&self, name: &str, document: &Value, assets: &[(&str, &[u8])]) -> PathBuf {
        let path = self.path(name);
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);

        writer
            .start_file("project.json", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(serde_json::to_string(document).unwrap().as_bytes())
            .unwrap();

        for (asset_name, bytes) in assets {
            writer
                .start_file(*asset_name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    /// Minimal PCM WAV bytes with the given byte rate and data length;
    /// duration is `data_len / byte_rate` seconds.
    pub fn wav_bytes(byte_rate: u32, data_len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend(std::iter::repeat_n(0u8, data_len as usize));
        out
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full = self.path(relative);
        assert!(full.exists(), "Expected path to exist: {}", full.display());
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_exists(&self, relative: &str) {
        let full = self.path(relative);
        assert!(
            !full.exists(),
            "Expected path to not exist: {}",
            full.display()
        );
    }
}
