//! Rigid registration of two volumes

mod elastix;

pub use elastix::{ElastixRegistrar, DEFAULT_RIGID_PARAMETERS};

use crate::error::{MrseqError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Result of a registration run
///
/// A tool that runs but fails is reported here with `success = false`; only local I/O
/// problems are returned as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    pub success: bool,
    /// Moving image resampled onto the fixed image grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_image: Option<PathBuf>,
    /// Serialized transform parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_parameters: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistrationOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result_image: None,
            transform_parameters: None,
            error: Some(error.into()),
        }
    }

    /// Turns a failed outcome into [`MrseqError::Registration`]
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(MrseqError::Registration(
                self.error.unwrap_or_else(|| "unknown failure".to_string()),
            ))
        }
    }
}

/// Registers a moving volume onto a fixed one, writing results into `output_dir`
pub trait Registrar {
    fn register(&self, fixed: &Path, moving: &Path, output_dir: &Path)
        -> Result<RegistrationOutcome>;
}
