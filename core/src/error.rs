use crate::diagnostics::Diagnostics;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ecgdicom operations
pub type Result<T> = std::result::Result<T, EcgDicomError>;

/// Stages of DICOM assembly, used to name the step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum AssemblyStage {
    FileMeta,
    PatientStudy,
    Waveform,
    AcquisitionContext,
    Annotations,
    Serialization,
}

impl AssemblyStage {
    /// Returns simple name for display
    pub const fn simple_name(&self) -> &'static str {
        match self {
            AssemblyStage::FileMeta => "file meta",
            AssemblyStage::PatientStudy => "patient/study info",
            AssemblyStage::Waveform => "waveform",
            AssemblyStage::AcquisitionContext => "acquisition context",
            AssemblyStage::Annotations => "annotations",
            AssemblyStage::Serialization => "serialization",
        }
    }
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Error types for ecgdicom operations
#[derive(Error, Debug)]
pub enum EcgDicomError {
    /// XML document could not be parsed
    #[error("XML error: {0}")]
    XmlError(String),

    /// Mandatory element missing from the XML tree
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// Numeric field with a malformed value
    #[error("Invalid number in {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Waveform payload could not be decoded or combined
    #[error("Waveform error: {0}")]
    WaveformError(String),

    /// Input file is not a supported vendor XML record
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Any extraction failure, wrapped with the source path
    #[error("Error extracting ECG data from {}: {source}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<EcgDicomError>,
    },

    /// DICOM assembly failure, wrapped with the stage that raised it
    #[error("Error in DICOM {stage} stage: {message}")]
    Assembly {
        stage: AssemblyStage,
        message: String,
    },

    /// Annotation rule table could not be loaded
    #[error("Annotation table error: {0}")]
    AnnotationError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EcgDicomError {
    /// Wraps an extraction error with the path of the offending file
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ EcgDicomError::Extraction { .. } => err,
            err => EcgDicomError::Extraction {
                path: path.into(),
                source: Box::new(err),
            },
        }
    }

    /// Builds an assembly error for the given stage
    pub fn assembly(stage: AssemblyStage, message: impl fmt::Display) -> Self {
        EcgDicomError::Assembly {
            stage,
            message: message.to_string(),
        }
    }

    /// Returns the assembly stage for stage-scoped errors
    pub fn stage(&self) -> Option<AssemblyStage> {
        match self {
            EcgDicomError::Assembly { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// A failed file conversion, keeping the notices raised before the failure
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ConversionFailure {
    #[source]
    pub error: EcgDicomError,
    pub diagnostics: Diagnostics,
}

impl From<roxmltree::Error> for EcgDicomError {
    fn from(e: roxmltree::Error) -> Self {
        EcgDicomError::XmlError(format!("{}", e))
    }
}

impl From<csv::Error> for EcgDicomError {
    fn from(e: csv::Error) -> Self {
        EcgDicomError::AnnotationError(format!("{}", e))
    }
}

impl From<base64::DecodeError> for EcgDicomError {
    fn from(e: base64::DecodeError) -> Self {
        EcgDicomError::WaveformError(format!("invalid base64 payload: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_names_path() {
        let err = EcgDicomError::MissingElement("LeadID".to_string()).in_file("/data/ecg.xml");
        let msg = err.to_string();
        assert!(msg.contains("/data/ecg.xml"));
        assert!(msg.contains("LeadID"));
    }

    #[test]
    fn test_in_file_does_not_double_wrap() {
        let err = EcgDicomError::XmlError("bad".to_string())
            .in_file("a.xml")
            .in_file("b.xml");
        match err {
            EcgDicomError::Extraction { path, .. } => assert_eq!(path, PathBuf::from("a.xml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_assembly_error_names_stage() {
        let err = EcgDicomError::assembly(AssemblyStage::Waveform, "lead I contains NaN");
        assert_eq!(err.stage(), Some(AssemblyStage::Waveform));
        assert_eq!(
            err.to_string(),
            "Error in DICOM waveform stage: lead I contains NaN"
        );
    }
}
