use crate::error::{MrseqError, Result};
use crate::types::SeriesKey;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Reference to one slice file, identified by the ids in its file name
///
/// Slice files follow the `<prefix>.Seq<S>.Ser<R>.Img<I>.dcm` naming convention.
/// The identity is derived from the name only, the file content is never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRef {
    pub sequence: u32,
    pub series: u32,
    pub image: u32,
    pub path: PathBuf,
}

fn slice_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(.*?)\.Seq(\d+)\.Ser(\d+)\.Img(\d+)\.dcm$").expect("Failed to compile regex")
    })
}

impl SliceRef {
    /// Parses a slice reference from a file path
    ///
    /// # Errors
    ///
    /// Returns [`MrseqError::FilenamePattern`] if the file name does not follow the
    /// `Seq<S>.Ser<R>.Img<I>.dcm` convention. The whole pipeline relies on this
    /// convention, so callers treat it as fatal.
    ///
    /// # Example
    ///
    /// ```
    /// use mrseq_core::SliceRef;
    ///
    /// let slice = SliceRef::parse("/data/Study.Seq3.Ser12.Img7.dcm").unwrap();
    /// assert_eq!((slice.sequence, slice.series, slice.image), (3, 12, 7));
    /// ```
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = file_name(path)?;
        let caps = slice_name_regex()
            .captures(name)
            .ok_or_else(|| MrseqError::FilenamePattern(name.to_string()))?;

        let number = |i: usize| -> Result<u32> {
            caps[i]
                .parse()
                .map_err(|_| MrseqError::FilenamePattern(name.to_string()))
        };

        Ok(Self {
            sequence: number(2)?,
            series: number(3)?,
            image: number(4)?,
            path: path.to_path_buf(),
        })
    }

    /// Returns the `(sequence, series)` key of the group this slice belongs to
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.sequence, self.series)
    }
}

/// Extracts the common prefix of a slice file name (everything before `.Seq`)
///
/// # Errors
///
/// Returns [`MrseqError::FilenamePattern`] if the name does not follow the convention.
pub fn parse_prefix(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let name = file_name(path)?;
    slice_name_regex()
        .captures(name)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| MrseqError::FilenamePattern(name.to_string()))
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MrseqError::FilenamePattern(path.display().to_string()))
}
