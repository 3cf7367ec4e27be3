use dicom_core::VR;
use dicom_object::InMemDicomObject;

use super::elements::{is_decimal_string, put_code_sequence, put_sequence, put_str, put_u16, Code};
use super::tags::*;
use crate::diagnostics::Diagnostics;
use crate::error::{AssemblyStage, EcgDicomError, Result};
use crate::types::{AnnotationRule, AnnotationRules, EcgMetadata};

const SOURCE: &str = AssemblyStage::Annotations.simple_name();

/// Rule used for the top-level `GlobalRR` value
pub const RR_INTERVAL: &str = "RRInterval";

/// Free-text diagnosis statements
pub const DIAGNOSIS_GROUP: u16 = 0;
/// Coded measurements
pub const MEASUREMENT_GROUP: u16 = 1;

/// Multiplex group 1, all channels
const ALL_CHANNELS: [u16; 2] = [1, 0];

/// Writes the waveform annotation sequence
///
/// Order: diagnosis statements as found in the record, the RR interval
/// from `GlobalRR`, then one coded item per rule (in rule-table order) whose
/// measurement is present.
///
/// # Errors
///
/// Returns an annotations-stage error if a measurement value is not a
/// valid decimal string
pub fn add_annotations(
    obj: &mut InMemDicomObject,
    meta: &EcgMetadata,
    rules: &AnnotationRules,
    diag: &mut Diagnostics,
) -> Result<()> {
    let mut items: Vec<InMemDicomObject> = meta.diagnosis.iter().map(|text| diagnosis_item(text)).collect();

    if let Some(rr) = meta.global_rr {
        match rules.get(RR_INTERVAL) {
            Some(rule) => items.push(measurement_item(RR_INTERVAL, &rr.to_string(), rule)?),
            None => diag.warn(
                SOURCE,
                format!("No '{}' annotation rule; GlobalRR not annotated", RR_INTERVAL),
            ),
        }
    }

    for (measurement, rule) in rules.iter() {
        if measurement == RR_INTERVAL {
            continue;
        }
        if let Some(value) = meta.measurements.get(measurement) {
            items.push(measurement_item(measurement, value, rule)?);
        }
    }

    log::debug!("Writing {} waveform annotations", items.len());
    put_sequence(obj, WAVEFORM_ANNOTATION_SEQUENCE, items);
    Ok(())
}

fn diagnosis_item(text: &str) -> InMemDicomObject {
    let mut item = InMemDicomObject::new_empty();
    put_u16(&mut item, REFERENCED_WAVEFORM_CHANNELS, &ALL_CHANNELS);
    put_u16(&mut item, ANNOTATION_GROUP_NUMBER, &[DIAGNOSIS_GROUP]);
    put_str(&mut item, UNFORMATTED_TEXT_VALUE, VR::ST, text);
    item
}

fn measurement_item(measurement: &str, value: &str, rule: &AnnotationRule) -> Result<InMemDicomObject> {
    if !is_decimal_string(value) {
        return Err(EcgDicomError::assembly(
            AssemblyStage::Annotations,
            format!("{} value '{}' is not a valid decimal string", measurement, value),
        ));
    }

    let mut item = InMemDicomObject::new_empty();
    put_u16(&mut item, REFERENCED_WAVEFORM_CHANNELS, &ALL_CHANNELS);
    put_u16(&mut item, ANNOTATION_GROUP_NUMBER, &[MEASUREMENT_GROUP]);
    put_str(&mut item, NUMERIC_VALUE, VR::DS, value.trim());
    put_code_sequence(
        &mut item,
        MEASUREMENT_UNITS_CODE_SEQUENCE,
        &Code::versioned(&rule.unit, "UCUM", "1.4", &rule.unit_description),
    );
    put_code_sequence(
        &mut item,
        CONCEPT_NAME_CODE_SEQUENCE,
        &Code::versioned(&rule.code, &rule.scheme, &rule.scheme_version, &rule.description),
    );
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Measurements;

    fn concept_code(item: &InMemDicomObject) -> String {
        let concept = get_items(item, CONCEPT_NAME_CODE_SEQUENCE);
        get_string_value(&concept[0], CODE_VALUE).unwrap()
    }

    fn metadata() -> EcgMetadata {
        let mut measurements = Measurements::new();
        measurements.insert("VentricularRate", "72");
        measurements.insert("PRInterval", "160");
        measurements.insert("QTCorrected", "415");
        EcgMetadata {
            measurements,
            diagnosis: vec!["Normal sinus rhythm".to_string(), "Normal ECG".to_string()],
            global_rr: Some(833),
            ..EcgMetadata::default()
        }
    }

    #[test]
    fn test_annotation_order_and_content() {
        let mut obj = InMemDicomObject::new_empty();
        let mut diag = Diagnostics::new();
        add_annotations(&mut obj, &metadata(), &AnnotationRules::default(), &mut diag).unwrap();

        let items = get_items(&obj, WAVEFORM_ANNOTATION_SEQUENCE);
        // 2 diagnoses, RR, PRInterval, VentricularRate (QTCorrected has no rule)
        assert_eq!(items.len(), 5);

        assert_eq!(
            get_string_value(&items[0], UNFORMATTED_TEXT_VALUE).as_deref(),
            Some("Normal sinus rhythm")
        );
        assert_eq!(get_u16_value(&items[1], ANNOTATION_GROUP_NUMBER), Some(0));

        assert_eq!(concept_code(&items[2]), "2:16168");
        assert_eq!(get_string_value(&items[2], NUMERIC_VALUE).as_deref(), Some("833"));
        assert_eq!(get_u16_value(&items[2], ANNOTATION_GROUP_NUMBER), Some(1));

        assert_eq!(concept_code(&items[3]), "2:15872");
        assert_eq!(concept_code(&items[4]), "8867-4");
        let units = get_items(&items[4], MEASUREMENT_UNITS_CODE_SEQUENCE);
        assert_eq!(get_string_value(&units[0], CODE_VALUE).as_deref(), Some("{H.B.}/min"));
        assert_eq!(get_string_value(&units[0], CODING_SCHEME_DESIGNATOR).as_deref(), Some("UCUM"));

        let channels = items[2]
            .element(REFERENCED_WAVEFORM_CHANNELS)
            .unwrap()
            .to_multi_int::<u16>()
            .unwrap();
        assert_eq!(channels, vec![1, 0]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_override_rule_is_used() {
        let mut overrides = AnnotationRules::empty();
        overrides.insert(
            "PRInterval",
            AnnotationRule::new("X-1", "PR custom", "ms", "millisecond", "99LOCAL", "1"),
        );
        let rules = AnnotationRules::default().merge(overrides);

        let mut obj = InMemDicomObject::new_empty();
        add_annotations(&mut obj, &metadata(), &rules, &mut Diagnostics::new()).unwrap();

        let items = get_items(&obj, WAVEFORM_ANNOTATION_SEQUENCE);
        assert_eq!(concept_code(&items[3]), "X-1");
    }

    #[test]
    fn test_missing_rr_rule_is_warning() {
        let mut rules = AnnotationRules::empty();
        rules.insert("PRInterval", AnnotationRules::default().get("PRInterval").unwrap().clone());

        let mut obj = InMemDicomObject::new_empty();
        let mut diag = Diagnostics::new();
        add_annotations(&mut obj, &metadata(), &rules, &mut diag).unwrap();

        assert_eq!(get_items(&obj, WAVEFORM_ANNOTATION_SEQUENCE).len(), 3);
        assert!(diag.mentions("GlobalRR not annotated"));
    }

    #[test]
    fn test_invalid_measurement_fails_stage() {
        let mut meta = metadata();
        meta.measurements.insert("QTInterval", "4O0");
        let err = add_annotations(
            &mut InMemDicomObject::new_empty(),
            &meta,
            &AnnotationRules::default(),
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert_eq!(err.stage(), Some(AssemblyStage::Annotations));
        assert!(err.to_string().contains("QTInterval"));
    }

    #[test]
    fn test_no_annotations_gives_empty_sequence() {
        let mut obj = InMemDicomObject::new_empty();
        add_annotations(
            &mut obj,
            &EcgMetadata::default(),
            &AnnotationRules::default(),
            &mut Diagnostics::new(),
        )
        .unwrap();
        assert!(obj.element(WAVEFORM_ANNOTATION_SEQUENCE).is_ok());
        assert!(get_items(&obj, WAVEFORM_ANNOTATION_SEQUENCE).is_empty());
    }
}
