//! Conversion of classified series into NIfTI volumes

mod materialize;
mod nifti_writer;

pub use self::materialize::{FailurePolicy, MaterializeReport, Materializer, RoleOutcome};
pub use self::nifti_writer::NiftiConverter;

use crate::error::Result;
use std::path::Path;

/// Turns a directory holding the slices of exactly one series into a volume file
pub trait VolumeConverter {
    fn convert(&self, source_dir: &Path, destination: &Path) -> Result<()>;
}

impl<T: VolumeConverter + ?Sized> VolumeConverter for &T {
    fn convert(&self, source_dir: &Path, destination: &Path) -> Result<()> {
        (**self).convert(source_dir, destination)
    }
}

impl<T: VolumeConverter + ?Sized> VolumeConverter for Box<T> {
    fn convert(&self, source_dir: &Path, destination: &Path) -> Result<()> {
        (**self).convert(source_dir, destination)
    }
}
