//! Directory scanning
//!
//! Lists the DICOM files of a study directory, parses the sequence/series/image ids
//! from their names and keeps the naming template needed to rebuild slice paths.

mod naming;

pub use naming::SliceNaming;

use crate::error::{MrseqError, Result};
use crate::types::SliceRef;
use crate::types::slice::parse_prefix;
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Offset of the `DICM` magic marker, right after the preamble
const DICOM_MAGIC_OFFSET: u64 = 128;
const DICOM_MAGIC: &[u8; 4] = b"DICM";

/// Checks if a file has a DICOM header
///
/// DICOM files have a 128-byte preamble followed by the 4-byte "DICM" magic string.
/// Unreadable or too short files are reported as not DICOM.
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    if file.seek(SeekFrom::Start(DICOM_MAGIC_OFFSET)).is_err() {
        return false;
    }

    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) => &magic == DICOM_MAGIC,
        Err(_) => false,
    }
}

/// Lists the DICOM files of an input path
///
/// If `input` is a directory, its entries (non-recursive) are probed with
/// [`is_dicom_file`] and non-DICOM files are silently skipped. Results are sorted by
/// file name. If `input` is a file, it is returned as the only entry.
pub fn list_dicom_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && is_dicom_file(&path) {
            files.push(path);
        } else {
            debug!("Skipping non-DICOM entry {}", path.display());
        }
    }
    files.sort();

    Ok(files)
}

/// A scanned study: the slice naming template and every slice reference
#[derive(Debug, Clone)]
pub struct Study {
    pub naming: SliceNaming,
    pub slices: Vec<SliceRef>,
}

/// Scans a study directory (or a single slice file)
///
/// # Errors
///
/// - [`MrseqError::NoDicomFiles`] if the input contains no DICOM files
/// - [`MrseqError::FilenamePattern`] if any DICOM file name does not follow the
///   `<prefix>.Seq<S>.Ser<R>.Img<I>.dcm` convention
pub fn scan_study(input: &Path) -> Result<Study> {
    let files = list_dicom_files(input)?;
    let first = files
        .first()
        .ok_or_else(|| MrseqError::NoDicomFiles(input.display().to_string()))?;

    let directory = if input.is_dir() {
        input.to_path_buf()
    } else {
        input.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    let naming = SliceNaming::new(directory, parse_prefix(first)?);

    let slices = files
        .iter()
        .map(SliceRef::parse)
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Found {} DICOM slices with prefix '{}'",
        slices.len(),
        naming.prefix()
    );

    Ok(Study { naming, slices })
}
