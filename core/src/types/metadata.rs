use super::WaveformSet;
use std::collections::BTreeMap;

/// Resting measurement fields read from `RestingECGMeasurements`
pub const MEASUREMENT_FIELDS: [&str; 15] = [
    "VentricularRate",
    "AtrialRate",
    "PRInterval",
    "QRSDuration",
    "QTInterval",
    "QTCorrected",
    "PAxis",
    "RAxis",
    "TAxis",
    "QRSCount",
    "QOnset",
    "QOffset",
    "POnset",
    "POffset",
    "TOffset",
];

/// Patient identity as found in `PatientDemographics`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PatientInfo {
    pub id: Option<String>,
    /// DICOM person name, "Last^First"
    pub name: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub birth_date: Option<String>,
}

/// A date/time pair as written in the vendor record
///
/// Either member may be absent on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DateTimePair {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl DateTimePair {
    pub fn new(date: Option<String>, time: Option<String>) -> Self {
        Self { date, time }
    }
}

/// Global resting measurements keyed by their vendor element name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct Measurements(BTreeMap<String, String>);

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn ventricular_rate(&self) -> Option<&str> {
        self.get("VentricularRate")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One QRS complex timing event from `QRSTimesTypes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct QrsTime {
    pub number: i64,
    pub qrs_type: i64,
    pub time: i64,
}

/// Flat metadata record extracted from one vendor XML document
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct EcgMetadata {
    pub patient: PatientInfo,

    /// `TestDemographics` acquisition date and time
    pub acquisition: DateTimePair,

    /// `Order` admission date and time
    pub admission: DateTimePair,

    pub acquisition_device: Option<String>,
    pub site_name: Option<String>,
    pub location_name: Option<String>,

    pub measurements: Measurements,

    /// Hz, from `ECGSampleBase * 10^ECGSampleExponent`
    pub sample_frequency: Option<f64>,

    /// Diagnosis statements in source order
    pub diagnosis: Vec<String>,

    pub qrs_times: Vec<QrsTime>,

    /// `QRSTimesTypes/GlobalRR`
    pub global_rr: Option<i64>,

    /// `QRSTimesTypes/QTRGGR`
    pub qt_trigger: Option<i64>,
}

/// Everything extracted from one vendor record
#[derive(Debug, Clone, PartialEq)]
pub struct EcgRecord {
    pub rhythm: Option<WaveformSet>,
    pub median: Option<WaveformSet>,
    pub metadata: EcgMetadata,
}
