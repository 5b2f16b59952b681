use crate::error::{MrseqError, Result};
use crate::scan::SliceNaming;
use crate::selection::Classification;
use crate::series::SeriesIndex;
use crate::types::SeriesKey;
use crate::volume::{NiftiConverter, VolumeConverter};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What to do when one role cannot be converted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure; the scratch directory is left behind
    #[default]
    Abort,
    /// Record the failure, clean up and continue with the next role
    SkipRole,
}

/// Result of converting one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOutcome {
    pub role: String,
    pub series: SeriesKey,
    pub output: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-role outcomes, in classification order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub outcomes: Vec<RoleOutcome>,
}

impl MaterializeReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RoleOutcome> {
        self.outcomes.iter().filter(|o| o.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &RoleOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }
}

/// Output file name for a role; `/` is not allowed in file names
pub fn output_file_name(role: &str) -> String {
    format!("{}.nii", role.replace('/', ""))
}

/// Copies each classified series into a scratch directory and converts it
pub struct Materializer<C = NiftiConverter> {
    naming: SliceNaming,
    scratch_dir: PathBuf,
    converter: C,
    policy: FailurePolicy,
}

impl Materializer<NiftiConverter> {
    /// Materializer with the native converter and `<study dir>/Temp` as scratch directory
    pub fn new(naming: SliceNaming) -> Self {
        let scratch_dir = naming.directory().join("Temp");
        Self {
            naming,
            scratch_dir,
            converter: NiftiConverter::new(),
            policy: FailurePolicy::default(),
        }
    }
}

impl<C: VolumeConverter> Materializer<C> {
    pub fn with_converter<D: VolumeConverter>(self, converter: D) -> Materializer<D> {
        Materializer {
            naming: self.naming,
            scratch_dir: self.scratch_dir,
            converter,
            policy: self.policy,
        }
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Converts every classified series to `<output_dir>/<role>.nii`
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`] the first failure is returned and later roles are not
    /// processed. Under [`FailurePolicy::SkipRole`] failures are only recorded in the report.
    pub fn materialize(
        &self,
        index: &SeriesIndex,
        classification: &Classification,
        output_dir: &Path,
    ) -> Result<MaterializeReport> {
        let mut report = MaterializeReport::default();

        for (role, key) in classification.iter() {
            let output = output_dir.join(output_file_name(role));
            info!("Creating output for Seq {} Ser {} ({})", key.sequence, key.series, role);

            match self.materialize_one(index, key, &output) {
                Ok(()) => {
                    info!("Done: {}", output.display());
                    report.outcomes.push(RoleOutcome {
                        role: role.to_string(),
                        series: key,
                        output,
                        success: true,
                        error: None,
                    });
                }
                Err(e) if self.policy == FailurePolicy::SkipRole => {
                    error!("Skipping {}: {}", role, e);
                    if let Err(cleanup) = fs::remove_dir_all(&self.scratch_dir) {
                        if cleanup.kind() != ErrorKind::NotFound {
                            warn!(
                                "Could not remove {}: {}",
                                self.scratch_dir.display(),
                                cleanup
                            );
                        }
                    }
                    report.outcomes.push(RoleOutcome {
                        role: role.to_string(),
                        series: key,
                        output,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    fn materialize_one(&self, index: &SeriesIndex, key: SeriesKey, output: &Path) -> Result<()> {
        let group = index
            .get(&key)
            .ok_or_else(|| MrseqError::InvalidValue(format!("series {} is not in the index", key)))?;

        self.create_scratch_dir()?;
        for slice in group.slices() {
            let target = self.naming.path_in(&self.scratch_dir, key, slice.image);
            fs::copy(&slice.path, &target)?;
        }

        self.converter.convert(&self.scratch_dir, output)?;
        fs::remove_dir_all(&self.scratch_dir)?;
        Ok(())
    }

    fn create_scratch_dir(&self) -> Result<()> {
        match fs::create_dir(&self.scratch_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!(
                    "Scratch directory {} already exists, clearing it",
                    self.scratch_dir.display()
                );
                // leftovers of an aborted run must not end up in this volume
                fs::remove_dir_all(&self.scratch_dir)?;
                fs::create_dir(&self.scratch_dir)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
