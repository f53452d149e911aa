//! Exploded project directory → archive.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;

use sbx_fs::{ProjectLayout, ProjectPath};

use crate::classify::AssetCategory;
use crate::{Error, Result};

/// Rebuild the archive for `project` and write it to the sibling
/// `<project>.sb3` path atomically.
pub fn pack(project: &Path) -> Result<PathBuf> {
    let layout = ProjectLayout::new(project);
    let bytes = pack_bytes(project)?;
    let out = layout.archive_path();
    sbx_fs::io::write_atomic(&out, &bytes)?;
    info!(archive = %out.display(), bytes = bytes.len(), "packed archive");
    Ok(out)
}

/// Rebuild the archive bytes for `project`.
///
/// Recomposes `src/` into a compact document entry inside a fresh staging
/// area, flattens every `assets/<category>` file next to it
/// (last-writer-wins on name collisions, in [`AssetCategory::ALL`] order),
/// and zips the staging area with sorted entries and a fixed timestamp so
/// identical input trees produce identical archives.
///
/// The staging area is a throwaway cache: recreated each call, never a
/// source of truth, and excluded from fingerprinting by the default ignore
/// rules.
pub fn pack_bytes(project: &Path) -> Result<Vec<u8>> {
    let layout = ProjectLayout::new(project);
    let document = sbx_codec::recompose(&layout.src_dir())?;

    let staging = layout.staging_dir();
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| Error::io(&staging, e))?;
    }
    fs::create_dir_all(&staging).map_err(|e| Error::io(&staging, e))?;

    let entry_path = staging.join(ProjectPath::DocumentEntry.as_str());
    let rendered = serde_json::to_string(&document).map_err(|e| Error::unsupported(
        &layout.src_dir(),
        format!("recomposed document failed to serialize: {e}"),
    ))?;
    fs::write(&entry_path, rendered).map_err(|e| Error::io(&entry_path, e))?;

    for category in AssetCategory::ALL {
        let dir = layout.asset_category_dir(category.dir_name());
        if !dir.is_dir() {
            continue;
        }
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| Error::io(&dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        for file in files {
            let Some(name) = file.file_name() else { continue };
            let dest = staging.join(name);
            fs::copy(&file, &dest).map_err(|e| Error::io(&file, e))?;
        }
    }

    zip_directory(&staging)
}

/// Zip every file at the top level of `dir` into deterministic archive bytes.
fn zip_directory(dir: &Path) -> Result<Vec<u8>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    // Fixed timestamp: repacking an unmodified project yields identical bytes.
    let fixed_time = zip::DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|e| Error::unsupported(dir, format!("invalid archive timestamp: {e}")))?;
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(fixed_time);

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for name in &names {
        let path = dir.join(name);
        writer.start_file(name.clone(), options)?;
        let mut file = File::open(&path).map_err(|e| Error::io(&path, e))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(|e| Error::io(&path, e))?;
        writer.write_all(&buf).map_err(|e| Error::io(&path, e))?;
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
