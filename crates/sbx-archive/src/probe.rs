//! WAV header duration probe.
//!
//! The default [`DurationProbe`]: reads the RIFF/WAVE `fmt ` and `data`
//! chunk headers and derives duration as `data length / byte rate`. Other
//! audio containers report a probe failure, which the classifier treats as
//! short audio.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::classify::DurationProbe;
use crate::{Error, Result};

/// Duration probe backed by RIFF/WAVE header parsing.
#[derive(Debug, Default)]
pub struct WavProbe;

impl DurationProbe for WavProbe {
    fn duration_secs(&self, path: &Path) -> Result<f64> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if extension != "wav" {
            return Err(Error::Probe {
                path: path.to_path_buf(),
                message: format!("no duration reader for '{extension}' containers"),
            });
        }

        let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
        wav_duration(&mut file).map_err(|message| Error::Probe {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Walk the chunk list of a RIFF/WAVE stream.
fn wav_duration<R: Read + Seek>(reader: &mut R) -> std::result::Result<f64, String> {
    let mut riff = [0u8; 12];
    reader
        .read_exact(&mut riff)
        .map_err(|_| "file too short for a RIFF header".to_string())?;
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err("not a RIFF/WAVE stream".to_string());
    }

    let mut byte_rate: Option<u32> = None;
    let mut data_len: Option<u32> = None;

    let mut header = [0u8; 8];
    while reader.read_exact(&mut header).is_ok() {
        let chunk_id = &header[0..4];
        let chunk_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if chunk_id == b"fmt " {
            if chunk_len < 16 {
                return Err("fmt chunk too short".to_string());
            }
            let mut fmt = [0u8; 16];
            reader
                .read_exact(&mut fmt)
                .map_err(|_| "truncated fmt chunk".to_string())?;
            byte_rate = Some(u32::from_le_bytes([fmt[8], fmt[9], fmt[10], fmt[11]]));
            skip_padded(reader, chunk_len as i64 - 16)?;
        } else {
            if chunk_id == b"data" {
                data_len = Some(chunk_len);
            }
            skip_padded(reader, chunk_len as i64)?;
        }

        if let (Some(rate), Some(len)) = (byte_rate, data_len) {
            if rate == 0 {
                return Err("byte rate is zero".to_string());
            }
            return Ok(f64::from(len) / f64::from(rate));
        }
    }

    Err("missing fmt or data chunk".to_string())
}

/// Chunks are word-aligned; odd lengths carry one padding byte.
fn skip_padded<R: Seek>(reader: &mut R, len: i64) -> std::result::Result<(), String> {
    let padded = len + (len & 1);
    reader
        .seek(SeekFrom::Current(padded))
        .map_err(|_| "truncated chunk body".to_string())?;
    Ok(())
}
