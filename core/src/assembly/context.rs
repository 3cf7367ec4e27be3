use dicom_core::VR;
use dicom_object::InMemDicomObject;

use super::elements::{is_decimal_string, put_code_sequence, put_sequence, put_str, Code};
use super::tags::*;
use crate::error::{AssemblyStage, EcgDicomError, Result};
use crate::types::Measurements;

pub const LEAD_SYSTEM: Code<'static> = Code::new("10:11345", "MDC", "Lead System");
pub const STANDARD_12_LEAD: Code<'static> = Code::new("10:11265", "MDC", "Standard 12-lead");
pub const HEART_RATE: Code<'static> = Code::versioned("8867-4", "LN", "19971101", "Heart rate");
pub const BEATS_PER_MINUTE: Code<'static> =
    Code::versioned("{H.B.}/min", "UCUM", "1.4", "Heart beat per minute");

/// Writes the acquisition context: the lead system and the heart rate
///
/// The heart rate item carries a NumericValue only when the record has a
/// ventricular rate.
///
/// # Errors
///
/// Returns an acquisition-context error if the ventricular rate is not a
/// valid decimal string
pub fn add_acquisition_context(obj: &mut InMemDicomObject, measurements: &Measurements) -> Result<()> {
    let mut lead_system = InMemDicomObject::new_empty();
    put_str(&mut lead_system, VALUE_TYPE, VR::CS, "CODE");
    put_code_sequence(&mut lead_system, CONCEPT_NAME_CODE_SEQUENCE, &LEAD_SYSTEM);
    put_code_sequence(&mut lead_system, CONCEPT_CODE_SEQUENCE, &STANDARD_12_LEAD);

    let mut heart_rate = InMemDicomObject::new_empty();
    put_str(&mut heart_rate, VALUE_TYPE, VR::CS, "NUMERIC");
    put_code_sequence(&mut heart_rate, CONCEPT_NAME_CODE_SEQUENCE, &HEART_RATE);
    put_code_sequence(&mut heart_rate, MEASUREMENT_UNITS_CODE_SEQUENCE, &BEATS_PER_MINUTE);
    if let Some(rate) = measurements.ventricular_rate() {
        if !is_decimal_string(rate) {
            return Err(EcgDicomError::assembly(
                AssemblyStage::AcquisitionContext,
                format!("VentricularRate '{}' is not a valid decimal string", rate),
            ));
        }
        put_str(&mut heart_rate, NUMERIC_VALUE, VR::DS, rate.trim());
    }

    put_sequence(obj, ACQUISITION_CONTEXT_SEQUENCE, vec![lead_system, heart_rate]);
    Ok(())
}
