use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// SOP Common Tags
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

// Study/Series Date and Time Tags
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
pub const ACQUISITION_DATE_TIME: Tag = Tag(0x0008, 0x002A);
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);

// Study/Series Identification Tags
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
pub const PROCEDURE_CODE_SEQUENCE: Tag = Tag(0x0008, 0x1032);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);

// Device/Institution Tags
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);

// Code Sequence Macro Tags
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
pub const CODING_SCHEME_VERSION: Tag = Tag(0x0008, 0x0103);
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);

// Performed Procedure Step Tags
pub const PERFORMED_PROCEDURE_STEP_START_DATE: Tag = Tag(0x0040, 0x0244);
pub const PERFORMED_PROCEDURE_STEP_START_TIME: Tag = Tag(0x0040, 0x0245);
pub const PERFORMED_PROCEDURE_STEP_END_DATE: Tag = Tag(0x0040, 0x0250);
pub const PERFORMED_PROCEDURE_STEP_END_TIME: Tag = Tag(0x0040, 0x0251);

// Acquisition Context and Annotation Tags
pub const ACQUISITION_CONTEXT_SEQUENCE: Tag = Tag(0x0040, 0x0555);
pub const MEASUREMENT_UNITS_CODE_SEQUENCE: Tag = Tag(0x0040, 0x08EA);
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
pub const REFERENCED_WAVEFORM_CHANNELS: Tag = Tag(0x0040, 0xA0B0);
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA168);
pub const ANNOTATION_GROUP_NUMBER: Tag = Tag(0x0040, 0xA180);
pub const NUMERIC_VALUE: Tag = Tag(0x0040, 0xA30A);
pub const WAVEFORM_ANNOTATION_SEQUENCE: Tag = Tag(0x0040, 0xB020);
pub const UNFORMATTED_TEXT_VALUE: Tag = Tag(0x0070, 0x0006);

// Waveform Multiplex Group Tags
pub const MULTIPLEX_GROUP_TIME_OFFSET: Tag = Tag(0x0018, 0x1068);
pub const TRIGGER_TIME_OFFSET: Tag = Tag(0x0018, 0x1069);
pub const WAVEFORM_ORIGINALITY: Tag = Tag(0x003A, 0x0004);
pub const NUMBER_OF_WAVEFORM_CHANNELS: Tag = Tag(0x003A, 0x0005);
pub const NUMBER_OF_WAVEFORM_SAMPLES: Tag = Tag(0x003A, 0x0010);
pub const SAMPLING_FREQUENCY: Tag = Tag(0x003A, 0x001A);
pub const MULTIPLEX_GROUP_LABEL: Tag = Tag(0x003A, 0x0020);
pub const WAVEFORM_SEQUENCE: Tag = Tag(0x5400, 0x0100);
pub const WAVEFORM_BITS_ALLOCATED: Tag = Tag(0x5400, 0x1004);
pub const WAVEFORM_SAMPLE_INTERPRETATION: Tag = Tag(0x5400, 0x1006);
pub const WAVEFORM_DATA: Tag = Tag(0x5400, 0x1010);

// Channel Definition Tags
pub const CHANNEL_DEFINITION_SEQUENCE: Tag = Tag(0x003A, 0x0200);
pub const WAVEFORM_CHANNEL_NUMBER: Tag = Tag(0x003A, 0x0202);
pub const CHANNEL_LABEL: Tag = Tag(0x003A, 0x0203);
pub const CHANNEL_STATUS: Tag = Tag(0x003A, 0x0205);
pub const CHANNEL_SOURCE_SEQUENCE: Tag = Tag(0x003A, 0x0208);
pub const CHANNEL_SENSITIVITY: Tag = Tag(0x003A, 0x0210);
pub const CHANNEL_SENSITIVITY_UNITS_SEQUENCE: Tag = Tag(0x003A, 0x0211);
pub const CHANNEL_SENSITIVITY_CORRECTION_FACTOR: Tag = Tag(0x003A, 0x0212);
pub const CHANNEL_BASELINE: Tag = Tag(0x003A, 0x0213);
pub const CHANNEL_SAMPLE_SKEW: Tag = Tag(0x003A, 0x0215);
pub const WAVEFORM_BITS_STORED: Tag = Tag(0x003A, 0x021A);
pub const FILTER_LOW_FREQUENCY: Tag = Tag(0x003A, 0x0220);
pub const FILTER_HIGH_FREQUENCY: Tag = Tag(0x003A, 0x0221);
pub const NOTCH_FILTER_FREQUENCY: Tag = Tag(0x003A, 0x0222);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Helper to get the items of a sequence tag
///
/// Returns an empty slice if the tag is absent or not a sequence
pub fn get_items(dcm: &InMemDicomObject, tag: Tag) -> &[InMemDicomObject] {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.items())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_dictionary_std::tags;
    use rstest::rstest;

    #[rstest]
    #[case(SPECIFIC_CHARACTER_SET, tags::SPECIFIC_CHARACTER_SET)]
    #[case(SOP_CLASS_UID, tags::SOP_CLASS_UID)]
    #[case(ACQUISITION_DATE_TIME, tags::ACQUISITION_DATE_TIME)]
    #[case(STATION_NAME, tags::STATION_NAME)]
    #[case(PROCEDURE_CODE_SEQUENCE, tags::PROCEDURE_CODE_SEQUENCE)]
    #[case(PATIENT_SEX, tags::PATIENT_SEX)]
    #[case(PERFORMED_PROCEDURE_STEP_END_TIME, tags::PERFORMED_PROCEDURE_STEP_END_TIME)]
    #[case(ACQUISITION_CONTEXT_SEQUENCE, tags::ACQUISITION_CONTEXT_SEQUENCE)]
    #[case(MEASUREMENT_UNITS_CODE_SEQUENCE, tags::MEASUREMENT_UNITS_CODE_SEQUENCE)]
    #[case(CONCEPT_CODE_SEQUENCE, tags::CONCEPT_CODE_SEQUENCE)]
    #[case(NUMERIC_VALUE, tags::NUMERIC_VALUE)]
    #[case(REFERENCED_WAVEFORM_CHANNELS, tags::REFERENCED_WAVEFORM_CHANNELS)]
    #[case(ANNOTATION_GROUP_NUMBER, tags::ANNOTATION_GROUP_NUMBER)]
    #[case(WAVEFORM_ANNOTATION_SEQUENCE, tags::WAVEFORM_ANNOTATION_SEQUENCE)]
    #[case(UNFORMATTED_TEXT_VALUE, tags::UNFORMATTED_TEXT_VALUE)]
    #[case(MULTIPLEX_GROUP_TIME_OFFSET, tags::MULTIPLEX_GROUP_TIME_OFFSET)]
    #[case(NUMBER_OF_WAVEFORM_SAMPLES, tags::NUMBER_OF_WAVEFORM_SAMPLES)]
    #[case(MULTIPLEX_GROUP_LABEL, tags::MULTIPLEX_GROUP_LABEL)]
    #[case(WAVEFORM_SEQUENCE, tags::WAVEFORM_SEQUENCE)]
    #[case(WAVEFORM_DATA, tags::WAVEFORM_DATA)]
    #[case(WAVEFORM_CHANNEL_NUMBER, tags::WAVEFORM_CHANNEL_NUMBER)]
    #[case(CHANNEL_SENSITIVITY_CORRECTION_FACTOR, tags::CHANNEL_SENSITIVITY_CORRECTION_FACTOR)]
    #[case(CHANNEL_SAMPLE_SKEW, tags::CHANNEL_SAMPLE_SKEW)]
    #[case(WAVEFORM_BITS_STORED, tags::WAVEFORM_BITS_STORED)]
    #[case(FILTER_LOW_FREQUENCY, tags::FILTER_LOW_FREQUENCY)]
    #[case(NOTCH_FILTER_FREQUENCY, tags::NOTCH_FILTER_FREQUENCY)]
    fn test_tags_match_dictionary(#[case] ours: Tag, #[case] dictionary: Tag) {
        assert_eq!(ours, dictionary);
    }

    #[test]
    fn test_getters_on_missing_tags() {
        let dcm = InMemDicomObject::new_empty();
        assert_eq!(get_string_value(&dcm, MODALITY), None);
        assert_eq!(get_u16_value(&dcm, NUMBER_OF_WAVEFORM_CHANNELS), None);
        assert!(get_items(&dcm, WAVEFORM_SEQUENCE).is_empty());
    }
}
