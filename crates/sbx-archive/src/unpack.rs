//! Archive → exploded project directory.

use std::fs::{self, File};
use std::path::Path;

use tracing::{info, warn};

use sbx_fs::ProjectLayout;

use crate::classify::{
    AssetCategory, DEFAULT_SHORT_AUDIO_SECS, DurationProbe, sort_assets,
};
use crate::probe::WavProbe;
use crate::{Error, Result};

/// Report of one unpack operation.
#[derive(Debug, Default)]
pub struct UnpackReport {
    /// Archive entries extracted.
    pub extracted: usize,
    /// Assets moved into categories, as `(file name, category)`.
    pub classified: Vec<(String, AssetCategory)>,
    /// Non-fatal classification warnings.
    pub warnings: Vec<String>,
}

/// Unpack with the default WAV probe and duration threshold.
pub fn unpack(archive: &Path, dest: &Path) -> Result<UnpackReport> {
    unpack_with(archive, dest, &WavProbe, DEFAULT_SHORT_AUDIO_SECS)
}

/// Extract `archive` into `dest`, classify its assets, and explode its
/// document entry into `dest/src`.
///
/// The extracted `project.json` is deleted once the exploded tree exists;
/// from then on the tree is the editable form.
///
/// # Errors
///
/// `UnsupportedArchive` when the input is not a readable zip, has no
/// document entry, or the document entry is not valid JSON.
pub fn unpack_with(
    archive: &Path,
    dest: &Path,
    probe: &dyn DurationProbe,
    threshold_secs: f64,
) -> Result<UnpackReport> {
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| Error::unsupported(archive, format!("not a readable archive: {e}")))?;

    let layout = ProjectLayout::new(dest);
    let document_entry = sbx_fs::ProjectPath::DocumentEntry.as_str();
    if !zip.file_names().any(|name| name == document_entry) {
        return Err(Error::unsupported(
            archive,
            format!("missing document entry '{document_entry}'"),
        ));
    }

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let mut report = UnpackReport::default();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping entry with unsafe path");
            continue;
        };
        let out_path = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| Error::io(&out_path, e))?;
            continue;
        }
        if let Some(parent) = out_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| Error::io(&out_path, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| Error::io(&out_path, e))?;
        report.extracted += 1;
    }

    let classified = sort_assets(&layout, probe, threshold_secs)?;
    report.classified = classified.moved;
    report.warnings = classified.warnings;

    let entry_path = layout.document_entry();
    let raw = fs::read_to_string(&entry_path).map_err(|e| Error::io(&entry_path, e))?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| Error::unsupported(archive, format!("document entry is not valid JSON: {e}")))?;

    // The codec is additive, so any stale exploded tree goes first.
    let src = layout.src_dir();
    if src.exists() {
        fs::remove_dir_all(&src).map_err(|e| Error::io(&src, e))?;
    }
    sbx_codec::decompose(&document, &src)?;

    fs::remove_file(&entry_path).map_err(|e| Error::io(&entry_path, e))?;

    info!(
        archive = %archive.display(),
        dest = %dest.display(),
        extracted = report.extracted,
        assets = report.classified.len(),
        "unpacked archive"
    );
    Ok(report)
}
