pub mod api;
pub mod assembly;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod extraction;
pub mod types;

pub use api::{output_path, ConversionReport, EcgConverter, EcgExtractor};
pub use assembly::{DicomAssembler, TWELVE_LEAD_ECG_SOP_CLASS_UID};
pub use cli::report::TextReport;
pub use diagnostics::{Diagnostics, Notice, Severity};
pub use error::{AssemblyStage, ConversionFailure, EcgDicomError, Result};
pub use types::*;
