use chrono::NaiveDateTime;
use dicom_core::VR;
use dicom_object::InMemDicomObject;

use super::datetime::{format_date, format_datetime, format_time, procedure_end, DICOM_DATE, DICOM_TIME};
use super::elements::{put_code_sequence, put_str, Code};
use super::tags::*;
use super::uid::generate_uid;
use crate::diagnostics::Diagnostics;
use crate::error::AssemblyStage;
use crate::types::{ConverterConfig, DateTimePair, EcgMetadata, WaveformSet};

const SOURCE: &str = AssemblyStage::PatientStudy.simple_name();

pub const MODALITY_ECG: &str = "ECG";
pub const RESTING_ECG: &str = "RestingECG";
pub const DEFAULT_PATIENT_NAME: &str = "Unknown^Patient";
pub const UNKNOWN: &str = "Unknown";

/// Requested procedure: 12 lead ECG
pub const PROCEDURE_CODE: Code<'static> = Code::new("P2-3120A", "SRT", "12 lead ECG");

/// SOP identity shared by the file meta group and the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SopIds {
    pub class_uid: String,
    pub instance_uid: String,
}

/// Writes the patient, study, series and equipment attributes
///
/// `now` is the instance creation timestamp.
pub fn add_patient_study_info(
    obj: &mut InMemDicomObject,
    meta: &EcgMetadata,
    sop: &SopIds,
    config: &ConverterConfig,
    now: NaiveDateTime,
    diag: &mut Diagnostics,
) {
    put_str(obj, SPECIFIC_CHARACTER_SET, VR::CS, &config.character_set);
    put_str(obj, INSTANCE_CREATION_DATE, VR::DA, now.format(DICOM_DATE).to_string());
    put_str(obj, INSTANCE_CREATION_TIME, VR::TM, now.format(DICOM_TIME).to_string());
    put_str(obj, SOP_CLASS_UID, VR::UI, &sop.class_uid);
    put_str(obj, SOP_INSTANCE_UID, VR::UI, &sop.instance_uid);
    put_str(obj, STUDY_INSTANCE_UID, VR::UI, generate_uid());
    put_str(obj, SERIES_INSTANCE_UID, VR::UI, generate_uid());

    let acquisition = &meta.acquisition;
    put_str(obj, CONTENT_DATE, VR::DA, format_date(acquisition.date.as_deref()));
    put_str(obj, CONTENT_TIME, VR::TM, format_time(acquisition.time.as_deref()));
    if acquisition.date.is_none() || acquisition.time.is_none() {
        diag.warn(
            SOURCE,
            "Incomplete or missing AcquisitionDate/AcquisitionTime; AcquisitionDateTime may be empty",
        );
    }
    put_str(
        obj,
        ACQUISITION_DATE_TIME,
        VR::DT,
        format_datetime(acquisition.date.as_deref(), acquisition.time.as_deref()),
    );

    let study_date = study_date(&meta.admission, acquisition, diag);
    put_str(obj, STUDY_DATE, VR::DA, &study_date);
    put_str(obj, SERIES_DATE, VR::DA, &study_date);
    let study_time = study_time(&meta.admission, acquisition, diag);
    put_str(obj, STUDY_TIME, VR::TM, &study_time);
    put_str(obj, SERIES_TIME, VR::TM, &study_time);

    put_str(obj, ACCESSION_NUMBER, VR::SH, "");
    put_str(obj, REFERRING_PHYSICIAN_NAME, VR::PN, "");
    put_str(obj, STUDY_ID, VR::SH, "");
    put_str(obj, SERIES_NUMBER, VR::IS, "1");
    put_str(obj, INSTANCE_NUMBER, VR::IS, "1");
    put_str(obj, MODALITY, VR::CS, MODALITY_ECG);
    put_str(obj, MANUFACTURER, VR::LO, &config.manufacturer);
    put_str(
        obj,
        MANUFACTURER_MODEL_NAME,
        VR::LO,
        or_unknown(meta.acquisition_device.as_deref(), "AcquisitionDevice", diag),
    );
    put_str(
        obj,
        STATION_NAME,
        VR::SH,
        or_unknown(meta.location_name.as_deref(), "LocationName", diag),
    );
    put_str(
        obj,
        INSTITUTION_NAME,
        VR::LO,
        or_unknown(meta.site_name.as_deref(), "SiteName", diag),
    );
    put_str(obj, STUDY_DESCRIPTION, VR::LO, RESTING_ECG);
    put_str(obj, SERIES_DESCRIPTION, VR::LO, RESTING_ECG);
    put_code_sequence(obj, PROCEDURE_CODE_SEQUENCE, &PROCEDURE_CODE);

    add_patient(obj, meta, diag);

    put_str(
        obj,
        PERFORMED_PROCEDURE_STEP_START_DATE,
        VR::DA,
        format_date(acquisition.date.as_deref()),
    );
    put_str(
        obj,
        PERFORMED_PROCEDURE_STEP_START_TIME,
        VR::TM,
        format_time(acquisition.time.as_deref()),
    );
}

fn add_patient(obj: &mut InMemDicomObject, meta: &EcgMetadata, diag: &mut Diagnostics) {
    let patient = &meta.patient;

    if patient.id.is_none() {
        diag.warn(SOURCE, "The tag 'PatientID' is not in the XML");
    }
    put_str(obj, PATIENT_ID, VR::LO, patient.id.as_deref().unwrap_or(""));

    put_str(obj, PATIENT_AGE, VR::AS, patient_age(patient.age.as_deref(), diag));

    match patient.sex.as_deref() {
        None => diag.warn(SOURCE, "The tag 'Gender' is not in the XML"),
        Some(sex) => match patient_sex(sex) {
            Some(code) => put_str(obj, PATIENT_SEX, VR::CS, code),
            None => diag.warn(SOURCE, format!("Unrecognized Gender '{}'; PatientSex left unset", sex)),
        },
    }

    let name = match patient.name.as_deref() {
        Some(name) => name,
        None => {
            diag.warn(SOURCE, "The tags of the patient names are not in the XML");
            DEFAULT_PATIENT_NAME
        }
    };
    put_str(obj, PATIENT_NAME, VR::PN, name);

    if patient.birth_date.is_none() {
        diag.warn(SOURCE, "The tag 'DateofBirth' is not in the XML");
    }
    put_str(obj, PATIENT_BIRTH_DATE, VR::DA, format_date(patient.birth_date.as_deref()));
}

/// Writes PerformedProcedureStepEndDate/Time from the rhythm recording length
///
/// An end that cannot be computed is recorded as an error notice and both
/// attributes are left empty.
pub fn add_procedure_end(
    obj: &mut InMemDicomObject,
    meta: &EcgMetadata,
    rhythm: Option<&WaveformSet>,
    diag: &mut Diagnostics,
) {
    let end = procedure_end(
        meta.acquisition.date.as_deref(),
        meta.acquisition.time.as_deref(),
        rhythm.and_then(WaveformSet::max_sample_count),
        meta.sample_frequency,
    );
    let (date, time) = match end {
        Ok(end) => (
            end.format(DICOM_DATE).to_string(),
            end.format(DICOM_TIME).to_string(),
        ),
        Err(reason) => {
            diag.error(SOURCE, format!("Cannot compute procedure step end: {}", reason));
            (String::new(), String::new())
        }
    };
    put_str(obj, PERFORMED_PROCEDURE_STEP_END_DATE, VR::DA, date);
    put_str(obj, PERFORMED_PROCEDURE_STEP_END_TIME, VR::TM, time);
}

/// Picks the study date: admission, else acquisition, else empty
fn study_date(admission: &DateTimePair, acquisition: &DateTimePair, diag: &mut Diagnostics) -> String {
    match (admission.date.as_deref(), acquisition.date.as_deref()) {
        (Some(date), _) => format_date(Some(date)),
        (None, Some(date)) => {
            diag.warn(SOURCE, "'AdmitDate' missing; using 'AcquisitionDate' for Study/Series Date");
            format_date(Some(date))
        }
        (None, None) => {
            diag.warn(SOURCE, "Neither 'AdmitDate' nor 'AcquisitionDate' available; Study/Series Date left empty");
            String::new()
        }
    }
}

/// Picks the study time: admission, else acquisition, else empty
fn study_time(admission: &DateTimePair, acquisition: &DateTimePair, diag: &mut Diagnostics) -> String {
    match (admission.time.as_deref(), acquisition.time.as_deref()) {
        (Some(time), _) => format_time(Some(time)),
        (None, Some(time)) => {
            diag.warn(SOURCE, "'AdmitTime' missing; using 'AcquisitionTime' for Study/Series Time");
            format_time(Some(time))
        }
        (None, None) => {
            diag.warn(SOURCE, "Neither 'AdmitTime' nor 'AcquisitionTime' available; Study/Series Time left empty");
            String::new()
        }
    }
}

fn or_unknown<'a>(value: Option<&'a str>, element: &str, diag: &mut Diagnostics) -> &'a str {
    value.unwrap_or_else(|| {
        diag.warn(SOURCE, format!("The tag '{}' is not in the XML", element));
        UNKNOWN
    })
}

/// Formats an age in years as DICOM AS (`NNNY`)
fn patient_age(age: Option<&str>, diag: &mut Diagnostics) -> String {
    match age {
        None => {
            diag.warn(SOURCE, "The tag 'PatientAge' is not in the XML");
            String::new()
        }
        Some(age) if !age.is_empty() && age.len() <= 3 && age.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{:0>3}Y", age)
        }
        Some(age) => {
            diag.warn(SOURCE, format!("PatientAge '{}' is not a number of years; left empty", age));
            String::new()
        }
    }
}

/// Maps a vendor gender to a DICOM sex code
fn patient_sex(sex: &str) -> Option<&'static str> {
    match sex.trim().to_lowercase().as_str() {
        "male" | "m" => Some("M"),
        "female" | "f" => Some("F"),
        "other" | "non-binary" | "o" => Some("O"),
        _ => None,
    }
}
