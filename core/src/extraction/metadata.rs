use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::types::{DateTimePair, EcgMetadata, Measurements, PatientInfo, QrsTime, MEASUREMENT_FIELDS};
use roxmltree::Node;

use super::numeric::{parse_int, sample_frequency};
use super::xml::{
    child_text, children, find_all, find_first, DIAGNOSIS, ORDER, PATIENT_DEMOGRAPHICS,
    QRS_TIMES_TYPES, RESTING_MEASUREMENTS, TEST_DEMOGRAPHICS,
};

const SOURCE: &str = "extract";

/// Extracts every metadata group of a vendor record
///
/// Each group is optional. Only a missing `PatientDemographics` section is
/// reported, since patient identity matters downstream.
///
/// # Errors
///
/// Returns an error if `GlobalRR` or `QTRGGR` is present but not an integer
pub fn extract_metadata(root: Node, diag: &mut Diagnostics) -> Result<EcgMetadata> {
    let mut metadata = EcgMetadata {
        patient: extract_patient(root, diag),
        ..EcgMetadata::default()
    };

    if let Some(test) = find_first(root, TEST_DEMOGRAPHICS) {
        metadata.acquisition = DateTimePair::new(
            child_text(test, "AcquisitionDate"),
            child_text(test, "AcquisitionTime"),
        );
        metadata.acquisition_device = child_text(test, "AcquisitionDevice");
        metadata.site_name = child_text(test, "SiteName");
        metadata.location_name = child_text(test, "LocationName");
    }

    if let Some(order) = find_first(root, ORDER) {
        metadata.admission =
            DateTimePair::new(child_text(order, "AdmitDate"), child_text(order, "AdmitTime"));
    }

    if let Some(measurements) = find_first(root, RESTING_MEASUREMENTS) {
        metadata.measurements = extract_measurements(measurements);
        let base = child_text(measurements, "ECGSampleBase");
        let exponent = child_text(measurements, "ECGSampleExponent");
        metadata.sample_frequency = sample_frequency(base.as_deref(), exponent.as_deref());
        if metadata.sample_frequency.is_none() && (base.is_some() || exponent.is_some()) {
            diag.warn(
                SOURCE,
                format!(
                    "Incomplete sample frequency (base {:?}, exponent {:?}); left unset",
                    base, exponent
                ),
            );
        }
    }

    if let Some(diagnosis) = find_first(root, DIAGNOSIS) {
        metadata.diagnosis = find_all(diagnosis, "DiagnosisStatement")
            .filter_map(|stmt| child_text(stmt, "StmtText"))
            .collect();
    }

    metadata.qrs_times = extract_qrs_times(root, diag);

    if let Some(qrs_types) = find_first(root, QRS_TIMES_TYPES) {
        metadata.global_rr = child_text(qrs_types, "GlobalRR")
            .map(|rr| parse_int("GlobalRR", &rr))
            .transpose()?;
        metadata.qt_trigger = child_text(qrs_types, "QTRGGR")
            .map(|qt| parse_int("QTRGGR", &qt))
            .transpose()?;
    }

    Ok(metadata)
}

fn extract_patient(root: Node, diag: &mut Diagnostics) -> PatientInfo {
    let Some(patient) = find_first(root, PATIENT_DEMOGRAPHICS) else {
        diag.warn(SOURCE, "No PatientDemographics section found in XML");
        return PatientInfo::default();
    };

    PatientInfo {
        id: child_text(patient, "PatientID"),
        name: person_name(
            child_text(patient, "PatientLastName"),
            child_text(patient, "PatientFirstName"),
        ),
        age: child_text(patient, "PatientAge"),
        sex: child_text(patient, "Gender"),
        birth_date: child_text(patient, "DateofBirth"),
    }
}

/// Builds a DICOM person name from its family and given parts
fn person_name(last: Option<String>, first: Option<String>) -> Option<String> {
    match (last, first) {
        (Some(last), Some(first)) => Some(format!("{}^{}", last, first)),
        (Some(last), None) => Some(last),
        (None, Some(first)) => Some(format!("^{}", first)),
        (None, None) => None,
    }
}

fn extract_measurements(node: Node) -> Measurements {
    let mut measurements = Measurements::new();
    for field in MEASUREMENT_FIELDS {
        if let Some(value) = child_text(node, field) {
            measurements.insert(field, value);
        }
    }
    measurements
}

/// Reads `QRSTimesTypes/QRS` entries; malformed entries are skipped
fn extract_qrs_times(root: Node, diag: &mut Diagnostics) -> Vec<QrsTime> {
    let mut times = Vec::new();
    for qrs_types in find_all(root, QRS_TIMES_TYPES) {
        for qrs in children(qrs_types, "QRS") {
            let field = |name: &str| -> Result<i64> {
                child_text(qrs, name).map_or(Ok(0), |text| parse_int(name, &text))
            };
            match (field("Number"), field("Type"), field("Time")) {
                (Ok(number), Ok(qrs_type), Ok(time)) => times.push(QrsTime {
                    number,
                    qrs_type,
                    time,
                }),
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    diag.warn(SOURCE, format!("Failed to parse QRS time: {}", e));
                }
            }
        }
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const FULL: &str = r#"<RestingECG>
  <PatientDemographics>
    <PatientID>PID-7</PatientID>
    <PatientAge>45</PatientAge>
    <Gender>MALE</Gender>
    <DateofBirth>01-02-1979</DateofBirth>
    <PatientLastName>Doe</PatientLastName>
    <PatientFirstName>John</PatientFirstName>
  </PatientDemographics>
  <TestDemographics>
    <AcquisitionDevice>MAC55</AcquisitionDevice>
    <SiteName>Cardiology</SiteName>
    <LocationName>Ward 3</LocationName>
    <AcquisitionTime>08:30:00</AcquisitionTime>
    <AcquisitionDate>03-15-2024</AcquisitionDate>
  </TestDemographics>
  <Order><AdmitDate>03-14-2024</AdmitDate></Order>
  <RestingECGMeasurements>
    <VentricularRate>72</VentricularRate>
    <PRInterval>160</PRInterval>
    <QTInterval></QTInterval>
    <ECGSampleBase>500</ECGSampleBase>
    <ECGSampleExponent>0</ECGSampleExponent>
  </RestingECGMeasurements>
  <Diagnosis>
    <DiagnosisStatement><StmtText> Normal sinus rhythm </StmtText></DiagnosisStatement>
    <DiagnosisStatement><StmtText></StmtText></DiagnosisStatement>
    <DiagnosisStatement><StmtText>Normal ECG</StmtText></DiagnosisStatement>
  </Diagnosis>
  <QRSTimesTypes>
    <QRS><Number>1</Number><Type>0</Type><Time>412</Time></QRS>
    <QRS><Number>2</Number><Type>x</Type><Time>1250</Time></QRS>
    <QRS><Number>3</Number><Type>0</Type><Time>2080</Time></QRS>
    <GlobalRR>833</GlobalRR>
    <QTRGGR>402</QTRGGR>
  </QRSTimesTypes>
</RestingECG>"#;

    fn extract(xml: &str) -> (Result<EcgMetadata>, Diagnostics) {
        let doc = Document::parse(xml).unwrap();
        let mut diag = Diagnostics::new();
        let result = extract_metadata(doc.root_element(), &mut diag);
        (result, diag)
    }

    #[test]
    fn test_full_record() {
        let (meta, diag) = extract(FULL);
        let meta = meta.unwrap();

        assert_eq!(meta.patient.id.as_deref(), Some("PID-7"));
        assert_eq!(meta.patient.name.as_deref(), Some("Doe^John"));
        assert_eq!(meta.patient.sex.as_deref(), Some("MALE"));
        assert_eq!(meta.acquisition.date.as_deref(), Some("03-15-2024"));
        assert_eq!(meta.acquisition.time.as_deref(), Some("08:30:00"));
        assert_eq!(meta.admission.date.as_deref(), Some("03-14-2024"));
        assert_eq!(meta.admission.time, None);
        assert_eq!(meta.location_name.as_deref(), Some("Ward 3"));
        assert_eq!(meta.measurements.ventricular_rate(), Some("72"));
        assert_eq!(meta.measurements.get("QTInterval"), None);
        assert_eq!(meta.sample_frequency, Some(500.0));
        assert_eq!(meta.diagnosis, vec!["Normal sinus rhythm", "Normal ECG"]);
        assert_eq!(meta.qrs_times.len(), 2);
        assert_eq!(meta.qrs_times[1].time, 2080);
        assert_eq!(meta.global_rr, Some(833));
        assert_eq!(meta.qt_trigger, Some(402));

        assert!(diag.mentions("Failed to parse QRS time"));
        assert!(!diag.mentions("PatientDemographics"));
    }

    #[test]
    fn test_empty_record() {
        let (meta, diag) = extract("<RestingECG/>");
        let meta = meta.unwrap();

        assert_eq!(meta, EcgMetadata::default());
        assert!(diag.mentions("No PatientDemographics section"));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_partial_sample_frequency_left_unset() {
        let xml = "<RestingECG><RestingECGMeasurements><ECGSampleBase>500</ECGSampleBase>\
                   </RestingECGMeasurements></RestingECG>";
        let (meta, diag) = extract(xml);
        assert_eq!(meta.unwrap().sample_frequency, None);
        assert!(diag.mentions("Incomplete sample frequency"));
    }

    #[test]
    fn test_malformed_global_rr_is_error() {
        let xml = "<RestingECG><QRSTimesTypes><GlobalRR>eight</GlobalRR></QRSTimesTypes></RestingECG>";
        let (meta, _) = extract(xml);
        assert!(meta.unwrap_err().to_string().contains("GlobalRR"));
    }

    #[test]
    fn test_person_name() {
        assert_eq!(
            person_name(Some("Doe".into()), Some("Jane".into())),
            Some("Doe^Jane".to_string())
        );
        assert_eq!(person_name(Some("Doe".into()), None), Some("Doe".to_string()));
        assert_eq!(person_name(None, Some("Jane".into())), Some("^Jane".to_string()));
        assert_eq!(person_name(None, None), None);
    }
}
