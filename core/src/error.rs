use thiserror::Error;

/// Result type for mrseq operations
pub type Result<T> = std::result::Result<T, MrseqError>;

/// Error types for mrseq operations
#[derive(Error, Debug)]
pub enum MrseqError {
    /// DICOM reading or writing error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// File name does not follow the `<prefix>.Seq<S>.Ser<R>.Img<I>.dcm` convention
    #[error("File name does not match the Seq/Ser/Img pattern: {0}")]
    FilenamePattern(String),

    /// Input path contained no DICOM files
    #[error("No DICOM files found in {0}")]
    NoDicomFiles(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Volume conversion failure
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Registration failure
    #[error("Registration error: {0}")]
    Registration(String),

    /// Invalid classifier or anonymizer configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for MrseqError {
    fn from(e: dicom_object::ReadError) -> Self {
        MrseqError::DicomError(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for MrseqError {
    fn from(e: dicom_object::WriteError) -> Self {
        MrseqError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for MrseqError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        MrseqError::InvalidValue(format!("{}", e))
    }
}

impl From<dicom_pixeldata::Error> for MrseqError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        MrseqError::Conversion(format!("{}", e))
    }
}

impl From<nifti::NiftiError> for MrseqError {
    fn from(e: nifti::NiftiError) -> Self {
        MrseqError::Conversion(format!("{}", e))
    }
}

impl From<regex::Error> for MrseqError {
    fn from(e: regex::Error) -> Self {
        MrseqError::Config(format!("{}", e))
    }
}
