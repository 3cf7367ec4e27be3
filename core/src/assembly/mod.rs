//! DICOM 12-lead ECG assembly
//!
//! Maps an extracted [`EcgRecord`] onto a 12-lead ECG Waveform Storage
//! object. Assembly runs in fixed stages (file meta, patient/study info,
//! waveform, acquisition context, annotations, serialization); any error
//! names the stage that raised it.

pub mod annotations;
pub mod context;
pub mod datetime;
pub mod elements;
pub mod patient;
pub mod tags;
pub mod uid;
pub mod waveform;
pub mod writer;

use chrono::Local;
use dicom_object::{FileDicomObject, InMemDicomObject};
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::types::{AnnotationRules, ConverterConfig, EcgRecord};
use patient::SopIds;

/// SOP class UID of 12-lead ECG Waveform Storage
pub const TWELVE_LEAD_ECG_SOP_CLASS_UID: &str = "1.2.840.10008.5.1.4.1.1.9.1.1";

/// Builds DICOM objects from extracted ECG records
///
/// # Example
///
/// ```
/// use ecgdicom_core::{AnnotationRules, ConverterConfig, Diagnostics, DicomAssembler, EcgRecord};
///
/// let assembler = DicomAssembler::new(ConverterConfig::new("2.25.1"), AnnotationRules::default());
/// let record = EcgRecord {
///     rhythm: None,
///     median: None,
///     metadata: Default::default(),
/// };
///
/// let mut diag = Diagnostics::new();
/// let bytes = assembler.to_bytes(&record, &mut diag).unwrap();
/// assert_eq!(&bytes[128..132], b"DICM");
/// ```
#[derive(Debug, Clone)]
pub struct DicomAssembler {
    config: ConverterConfig,
    rules: AnnotationRules,
}

impl DicomAssembler {
    pub fn new(config: ConverterConfig, rules: AnnotationRules) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn rules(&self) -> &AnnotationRules {
        &self.rules
    }

    /// Assembles the DICOM object for a record
    ///
    /// # Errors
    ///
    /// Returns [`crate::EcgDicomError::Assembly`] naming the failing stage
    pub fn assemble(
        &self,
        record: &EcgRecord,
        diag: &mut Diagnostics,
    ) -> Result<FileDicomObject<InMemDicomObject>> {
        let sop = SopIds {
            class_uid: TWELVE_LEAD_ECG_SOP_CLASS_UID.to_string(),
            instance_uid: uid::generate_uid(),
        };
        let meta = writer::file_meta(&self.config, &sop)?;

        let metadata = &record.metadata;
        let rhythm = record.rhythm.as_ref();
        let median = record.median.as_ref();
        let mut obj = InMemDicomObject::new_empty();

        patient::add_patient_study_info(
            &mut obj,
            metadata,
            &sop,
            &self.config,
            Local::now().naive_local(),
            diag,
        );
        patient::add_procedure_end(&mut obj, metadata, rhythm, diag);
        waveform::add_waveforms(&mut obj, rhythm, median, metadata.sample_frequency, diag)?;
        context::add_acquisition_context(&mut obj, &metadata.measurements)?;
        annotations::add_annotations(&mut obj, metadata, &self.rules, diag)?;

        log::debug!("Assembled SOP instance {}", sop.instance_uid);
        writer::attach_meta(obj, meta)
    }

    /// Assembles and serializes a record to Part-10 bytes
    pub fn to_bytes(&self, record: &EcgRecord, diag: &mut Diagnostics) -> Result<Vec<u8>> {
        let file = self.assemble(record, diag)?;
        writer::to_bytes(&file)
    }

    /// Assembles a record and writes it to `path`
    ///
    /// Nothing is written unless every stage succeeds.
    pub fn write_file(&self, record: &EcgRecord, path: &Path, diag: &mut Diagnostics) -> Result<()> {
        let bytes = self.to_bytes(record, diag)?;
        writer::write_atomic(path, &bytes)?;
        log::info!("DICOM file saved as {}", path.display());
        Ok(())
    }
}
