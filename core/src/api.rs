use crate::assembly::DicomAssembler;
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{ConversionFailure, EcgDicomError, Result};
use crate::extraction::extract_record;
use crate::types::{AnnotationRules, ConverterConfig, EcgRecord};
use std::path::{Path, PathBuf};

/// Extractor for vendor resting ECG XML records
///
/// Provides a high-level API for reading waveforms and metadata from a
/// record, either from text or from a file.
///
/// # Example
///
/// ```
/// use ecgdicom_core::{Diagnostics, EcgExtractor};
///
/// let xml = r#"<RestingECG>
///   <PatientDemographics><PatientID>1234</PatientID></PatientDemographics>
///   <RestingECGMeasurements>
///     <VentricularRate>72</VentricularRate>
///     <ECGSampleBase>500</ECGSampleBase>
///     <ECGSampleExponent>0</ECGSampleExponent>
///   </RestingECGMeasurements>
/// </RestingECG>"#;
///
/// let mut diag = Diagnostics::new();
/// let record = EcgExtractor::extract(xml, &mut diag).unwrap();
///
/// assert_eq!(record.metadata.patient.id.as_deref(), Some("1234"));
/// assert_eq!(record.metadata.sample_frequency, Some(500.0));
/// assert!(record.rhythm.is_none());
/// assert!(diag.mentions("No 'Rhythm' waveform"));
/// ```
pub struct EcgExtractor;

impl EcgExtractor {
    /// Extracts a record from XML text
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The text is not well-formed XML
    /// - A waveform block lacks a mandatory element or has an invalid payload
    /// - An integral field (sample count, GlobalRR, QTRGGR) is malformed
    pub fn extract(xml: &str, diag: &mut Diagnostics) -> Result<EcgRecord> {
        Self::extract_with_options(xml, false, diag)
    }

    /// Extracts a record with optional legacy sign handling
    ///
    /// With `legacy_plus_sign` every "+" in amplitude factors is read as
    /// "-", reproducing files produced by older converters.
    pub fn extract_with_options(xml: &str, legacy_plus_sign: bool, diag: &mut Diagnostics) -> Result<EcgRecord> {
        extract_record(xml, legacy_plus_sign, diag)
    }

    /// Extracts a record from an `.xml` file
    ///
    /// Every failure is wrapped in [`EcgDicomError::Extraction`] naming the
    /// file.
    pub fn extract_file(path: &Path, legacy_plus_sign: bool, diag: &mut Diagnostics) -> Result<EcgRecord> {
        Self::read_and_extract(path, legacy_plus_sign, diag).map_err(|e| e.in_file(path))
    }

    fn read_and_extract(path: &Path, legacy_plus_sign: bool, diag: &mut Diagnostics) -> Result<EcgRecord> {
        let is_xml = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"));
        if !is_xml {
            return Err(EcgDicomError::UnsupportedInput(
                "Only .xml files are supported".to_string(),
            ));
        }

        let bytes = std::fs::read(path)?;
        log::info!("Processing file: {}", path.display());
        Self::extract_with_options(&decode_text(&bytes), legacy_plus_sign, diag)
    }
}

/// Decodes record bytes as UTF-8, falling back to ISO-8859-1
fn decode_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Derives the output file name: the input name without any extension, plus `.dcm`
///
/// Leading dots belong to the name, so `.hidden.xml` becomes `.hidden.dcm`.
///
/// # Errors
///
/// Returns an error if the input has no file name
pub fn output_path(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let mut stem = input.file_name().map(Path::new).ok_or_else(|| {
        EcgDicomError::UnsupportedInput(format!(
            "cannot derive an output name from {}",
            input.display()
        ))
    })?;
    while stem.extension().is_some() {
        match stem.file_stem() {
            Some(inner) => stem = Path::new(inner),
            None => break,
        }
    }

    let mut name = stem.as_os_str().to_os_string();
    name.push(".dcm");
    Ok(output_dir.join(name))
}

/// End-to-end converter from vendor XML files to DICOM files
pub struct EcgConverter {
    assembler: DicomAssembler,
}

impl EcgConverter {
    pub fn new(config: ConverterConfig, rules: AnnotationRules) -> Self {
        Self {
            assembler: DicomAssembler::new(config, rules),
        }
    }

    /// Converts one XML file into `output_dir`
    ///
    /// # Errors
    ///
    /// Returns an extraction error naming the input, or an assembly error
    /// naming the failed stage, together with the notices recorded up to
    /// the failure. No output file is left behind on failure.
    pub fn convert_file(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> std::result::Result<ConversionReport, ConversionFailure> {
        let mut diagnostics = Diagnostics::new();
        match self.write_converted(input, output_dir, &mut diagnostics) {
            Ok((output, record)) => Ok(ConversionReport {
                source: input.to_path_buf(),
                output,
                rhythm_leads: record.rhythm.as_ref().map_or(0, |set| set.len()),
                median_leads: record.median.as_ref().map_or(0, |set| set.len()),
                diagnostics,
            }),
            Err(error) => Err(ConversionFailure { error, diagnostics }),
        }
    }

    fn write_converted(
        &self,
        input: &Path,
        output_dir: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<(PathBuf, EcgRecord)> {
        let output = output_path(input, output_dir)?;
        let record = EcgExtractor::extract_file(
            input,
            self.assembler.config().legacy_plus_sign,
            diagnostics,
        )?;
        self.assembler.write_file(&record, &output, diagnostics)?;
        Ok((output, record))
    }
}

/// Outcome of one successful conversion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ConversionReport {
    /// Input XML file
    pub source: PathBuf,

    /// Written DICOM file
    pub output: PathBuf,

    /// Leads present in the rhythm waveform, derived ones included
    pub rhythm_leads: usize,

    /// Leads present in the median waveform, derived ones included
    pub median_leads: usize,

    /// Notices raised while converting
    pub diagnostics: Diagnostics,
}

impl ConversionReport {
    pub fn warning_count(&self) -> usize {
        self.diagnostics.at_least(Severity::Warning).count()
    }
}
