use crate::types::SeriesKey;
use std::path::{Path, PathBuf};

/// Template that rebuilds slice file names from their ids
///
/// All slices of a study share one prefix, extracted once from the first file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceNaming {
    directory: PathBuf,
    prefix: String,
}

impl SliceNaming {
    /// Creates a new SliceNaming
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `<prefix>.Seq<S>.Ser<R>.Img<I>.dcm`
    pub fn file_name(&self, key: SeriesKey, image: u32) -> String {
        format!(
            "{}.Seq{}.Ser{}.Img{}.dcm",
            self.prefix, key.sequence, key.series, image
        )
    }

    /// Returns the path of a slice inside the study directory
    pub fn path_for(&self, key: SeriesKey, image: u32) -> PathBuf {
        self.directory.join(self.file_name(key, image))
    }

    /// Returns the path of a slice inside another directory (e.g. a scratch directory)
    pub fn path_in(&self, directory: &Path, key: SeriesKey, image: u32) -> PathBuf {
        directory.join(self.file_name(key, image))
    }
}
