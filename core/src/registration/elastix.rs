use crate::error::Result;
use crate::registration::{RegistrationOutcome, Registrar};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Parameter map of elastix's default `rigid` registration (Euler transform, mutual information)
pub const DEFAULT_RIGID_PARAMETERS: &str = r#"(AutomaticParameterEstimation "true")
(AutomaticScalesEstimation "true")
(AutomaticTransformInitialization "true")
(CheckNumberOfSamples "true")
(DefaultPixelValue 0)
(FinalBSplineInterpolationOrder 3)
(FixedImagePyramid "FixedSmoothingImagePyramid")
(FixedInternalImagePixelType "float")
(HowToCombineTransforms "Compose")
(ImageSampler "RandomCoordinate")
(Interpolator "LinearInterpolator")
(MaximumNumberOfIterations 256)
(MaximumNumberOfSamplingAttempts 8)
(Metric "AdvancedMattesMutualInformation")
(MovingImagePyramid "MovingSmoothingImagePyramid")
(MovingInternalImagePixelType "float")
(NewSamplesEveryIteration "true")
(NumberOfResolutions 4)
(NumberOfSamplesForExactGradient 4096)
(NumberOfSpatialSamples 2048)
(Optimizer "AdaptiveStochasticGradientDescent")
(Registration "MultiResolutionRegistration")
(ResampleInterpolator "FinalBSplineInterpolator")
(Resampler "DefaultResampler")
(ResultImageFormat "nii")
(Transform "EulerTransform")
(WriteIterationInfo "false")
(WriteResultImage "true")
"#;

pub const PARAMETER_FILE_NAME: &str = "rigid.txt";
pub const RESULT_IMAGE_NAME: &str = "result.0.nii";
pub const TRANSFORM_PARAMETERS_NAME: &str = "TransformParameters.0.txt";

/// Rigid registration through the `elastix` command-line tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElastixRegistrar {
    executable: PathBuf,
}

impl Default for ElastixRegistrar {
    fn default() -> Self {
        Self::new("elastix")
    }
}

impl ElastixRegistrar {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Writes the rigid parameter map into `output_dir`
    pub fn write_parameter_file(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(PARAMETER_FILE_NAME);
        fs::write(&path, DEFAULT_RIGID_PARAMETERS)?;
        Ok(path)
    }
}

impl Registrar for ElastixRegistrar {
    fn register(
        &self,
        fixed: &Path,
        moving: &Path,
        output_dir: &Path,
    ) -> Result<RegistrationOutcome> {
        let parameter_file = self.write_parameter_file(output_dir)?;

        info!(
            "Registering {} onto {}",
            moving.display(),
            fixed.display()
        );
        debug!("Running {}", self.executable.display());

        let output = Command::new(&self.executable)
            .arg("-f")
            .arg(fixed)
            .arg("-m")
            .arg(moving)
            .arg("-p")
            .arg(&parameter_file)
            .arg("-out")
            .arg(output_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!("Could not run {}: {}", self.executable.display(), e);
                return Ok(RegistrationOutcome::failure(format!(
                    "could not run {}: {}",
                    self.executable.display(),
                    e
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.to_string()
            } else {
                stderr.to_string()
            };
            return Ok(RegistrationOutcome::failure(format!(
                "elastix exited with {}: {}",
                output.status,
                message.trim()
            )));
        }

        let result_image = output_dir.join(RESULT_IMAGE_NAME);
        let transform_parameters = output_dir.join(TRANSFORM_PARAMETERS_NAME);
        if !transform_parameters.exists() {
            return Ok(RegistrationOutcome::failure(format!(
                "elastix did not write {}",
                transform_parameters.display()
            )));
        }

        Ok(RegistrationOutcome {
            success: true,
            result_image: result_image.exists().then_some(result_image),
            transform_parameters: Some(transform_parameters),
            error: None,
        })
    }
}
