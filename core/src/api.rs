use crate::error::Result;
use crate::extraction::{default_tag_rules, TagRule};
use crate::scan::{scan_study, Study};
use crate::selection::{classify, Classification, ClassifierConfig};
use crate::series::SeriesIndex;
use crate::volume::{FailurePolicy, MaterializeReport, Materializer};
use log::info;
use std::path::{Path, PathBuf};

/// Options of [`SequenceExtractor::create_nii`]
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// File name of the JSON series table written into the output directory
    pub json_name: Option<String>,

    /// Role assignment rules
    pub classifier: ClassifierConfig,

    /// Tags read from each series
    pub tag_rules: Vec<TagRule>,

    /// Scratch directory; `<input>/Temp` when unset
    pub scratch_dir: Option<PathBuf>,

    /// Behavior when one role fails to convert
    pub policy: FailurePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            json_name: None,
            classifier: ClassifierConfig::default(),
            tag_rules: default_tag_rules(),
            scratch_dir: None,
            policy: FailurePolicy::default(),
        }
    }
}

/// A scanned study with its series table
#[derive(Debug, Clone)]
pub struct Catalog {
    pub study: Study,
    pub index: SeriesIndex,
}

/// Everything produced by one [`SequenceExtractor::create_nii`] run
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub index: SeriesIndex,
    pub classification: Classification,
    pub report: MaterializeReport,
}

/// Main entry point: from a study directory to one NIfTI volume per selected sequence
///
/// # Example
///
/// ```no_run
/// use mrseq_core::{ExtractOptions, SequenceExtractor};
/// use std::path::Path;
///
/// let options = ExtractOptions {
///     json_name: Some("sequences.json".to_string()),
///     ..Default::default()
/// };
/// let summary = SequenceExtractor::create_nii(
///     Path::new("/data/MR_021_anon"),
///     Path::new("/data/nii/MR_021_anon"),
///     &options,
/// )
/// .unwrap();
/// for (role, key) in summary.classification.iter() {
///     println!("{} -> {}", role, key);
/// }
/// ```
pub struct SequenceExtractor;

impl SequenceExtractor {
    /// Scans `input`, groups its slices into series and reads each series' tags
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input contains no DICOM files
    /// - A file name does not follow the `Seq/Ser/Img` convention
    /// - A representative slice cannot be parsed as DICOM
    pub fn catalog(input: &Path, rules: &[TagRule]) -> Result<Catalog> {
        let study = scan_study(input)?;
        let mut index = SeriesIndex::from_slices(study.slices.iter().cloned());
        index.merge_metadata(rules)?;
        Ok(Catalog { study, index })
    }

    /// Runs the full pipeline: catalog, optional JSON table, classification and conversion
    pub fn create_nii(input: &Path, output: &Path, options: &ExtractOptions) -> Result<ExtractionSummary> {
        if output.is_dir() {
            info!("Copying files to {}", output.display());
        } else {
            info!("Output dir does not exist. Creating {}...", output.display());
            std::fs::create_dir_all(output)?;
        }

        let Catalog { study, index } = Self::catalog(input, &options.tag_rules)?;
        index.log_summary();

        if let Some(name) = &options.json_name {
            index.write_json(&output.join(name))?;
        }

        let classification = classify(&index, &options.classifier)?;
        info!(
            "Found the following sequences: {}",
            classification.names().collect::<Vec<_>>().join(", ")
        );

        let mut materializer = Materializer::new(study.naming).with_policy(options.policy);
        if let Some(scratch_dir) = &options.scratch_dir {
            materializer = materializer.with_scratch_dir(scratch_dir);
        }
        let report = materializer.materialize(&index, &classification, output)?;

        Ok(ExtractionSummary {
            index,
            classification,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert!(options.json_name.is_none());
        assert_eq!(options.policy, FailurePolicy::Abort);
        assert_eq!(options.tag_rules.len(), 6);
        assert_eq!(options.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_catalog_of_empty_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(SequenceExtractor::catalog(dir.path(), &default_tag_rules()).is_err());
    }
}
