pub mod leads;
pub mod metadata;
pub mod numeric;
pub mod waveform;
pub mod xml;

pub use leads::derive_limb_leads;
pub use metadata::extract_metadata;
pub use numeric::{parse_locale_float, sample_frequency};
pub use waveform::{decode_samples, extract_waveforms, scale_samples};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::types::EcgRecord;
use roxmltree::{Document, ParsingOptions};

/// Extracts waveforms and metadata from a vendor XML document
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML or a mandatory
/// waveform element is missing or malformed
pub fn extract_record(xml: &str, legacy_plus_sign: bool, diag: &mut Diagnostics) -> Result<EcgRecord> {
    // Vendor exports reference an external DTD (restecg.dtd) that is never loaded
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    let (rhythm, median) = extract_waveforms(root, legacy_plus_sign, diag)?;
    let metadata = extract_metadata(root, diag)?;

    log::debug!(
        "Extracted record: rhythm={}, median={}, {} measurements, {} diagnosis statements",
        rhythm.as_ref().map_or(0, |s| s.len()),
        median.as_ref().map_or(0, |s| s.len()),
        metadata.measurements.len(),
        metadata.diagnosis.len()
    );

    Ok(EcgRecord {
        rhythm,
        median,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_xml_is_error() {
        let mut diag = Diagnostics::new();
        let err = extract_record("<RestingECG><Waveform>", false, &mut diag).unwrap_err();
        assert!(matches!(err, crate::error::EcgDicomError::XmlError(_)));
    }

    #[test]
    fn test_doctype_prefixed_record() {
        let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<!DOCTYPE RestingECG SYSTEM "restecg.dtd">
<RestingECG>
  <PatientDemographics><PatientID>42</PatientID></PatientDemographics>
  <Waveform>
    <WaveformType>Rhythm</WaveformType>
    <LeadData>
      <LeadID>I</LeadID>
      <LeadAmplitudeUnitsPerBit>4.88</LeadAmplitudeUnitsPerBit>
      <LeadSampleCountTotal>2</LeadSampleCountTotal>
      <WaveFormData>AQACAA==</WaveFormData>
    </LeadData>
  </Waveform>
</RestingECG>"#;
        let mut diag = Diagnostics::new();
        let record = extract_record(xml, false, &mut diag).unwrap();

        let rhythm = record.rhythm.unwrap();
        assert_eq!(rhythm.samples(crate::types::Lead::I).unwrap().len(), 2);
        assert_eq!(record.metadata.patient.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_record_without_waveforms() {
        let mut diag = Diagnostics::new();
        let record = extract_record("<RestingECG/>", false, &mut diag).unwrap();
        assert!(record.rhythm.is_none());
        assert!(record.median.is_none());
        assert!(diag.mentions("No 'Rhythm' waveform"));
        assert!(diag.mentions("No 'Median' waveform"));
    }
}
