use crate::error::{EcgDicomError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Coding of one measurement as a DICOM waveform annotation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AnnotationRule {
    /// Concept code in `scheme`
    pub code: String,
    /// Concept code meaning
    pub description: String,
    /// UCUM unit code
    pub unit: String,
    pub unit_description: String,
    /// Coding scheme designator of `code` (MDC, LN, SCPECG, ...)
    pub scheme: String,
    pub scheme_version: String,
}

impl AnnotationRule {
    pub fn new(
        code: &str,
        description: &str,
        unit: &str,
        unit_description: &str,
        scheme: &str,
        scheme_version: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            unit_description: unit_description.to_string(),
            scheme: scheme.to_string(),
            scheme_version: scheme_version.to_string(),
        }
    }
}

/// Row of a `;`-delimited annotation override file
#[derive(Debug, Deserialize)]
struct CsvRow {
    measurement: String,
    code: String,
    description: String,
    unit: String,
    unit_description: String,
    scheme: String,
    scheme_version: String,
}

impl CsvRow {
    fn into_rule(self) -> (String, AnnotationRule) {
        (
            self.measurement.trim().to_string(),
            AnnotationRule {
                code: self.code,
                description: self.description,
                unit: self.unit,
                unit_description: self.unit_description,
                scheme: self.scheme,
                scheme_version: self.scheme_version,
            },
        )
    }
}

/// Measurement name → annotation coding
///
/// Iteration follows sorted measurement names, so annotation order is
/// stable for a given table.
///
/// # Example
///
/// ```
/// use ecgdicom_core::{AnnotationRule, AnnotationRules};
///
/// let mut overrides = AnnotationRules::empty();
/// overrides.insert(
///     "PRInterval",
///     AnnotationRule::new("X-1", "PR custom", "ms", "millisecond", "LOCAL", "1"),
/// );
///
/// let rules = AnnotationRules::default().merge(overrides);
/// assert_eq!(rules.get("PRInterval").unwrap().code, "X-1");
/// assert_eq!(rules.get("QTInterval").unwrap().code, "2:16160");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRules {
    rules: BTreeMap<String, AnnotationRule>,
}

impl Default for AnnotationRules {
    fn default() -> Self {
        let mdc = |code, desc| AnnotationRule::new(code, desc, "ms", "millisecond", "MDC", "20080927");
        let loinc_axis = |code, desc| AnnotationRule::new(code, desc, "deg", "degree", "LN", "19971101");
        let scp_point = |code, desc| AnnotationRule::new(code, desc, "POINT", "POINT", "SCPECG", "1.3");

        let mut rules = Self::empty();
        rules.insert("PRInterval", mdc("2:15872", "PR interval global"));
        rules.insert("QTInterval", mdc("2:16160", "QT interval global"));
        rules.insert("QRSDuration", mdc("2:16156", "QRS duration global"));
        rules.insert("RRInterval", mdc("2:16168", "RR interval global"));
        rules.insert(
            "VentricularRate",
            AnnotationRule::new(
                "8867-4",
                "Heart rate",
                "{H.B.}/min",
                "Heart beat per minute",
                "LN",
                "19971101",
            ),
        );
        rules.insert("PAxis", loinc_axis("8626-4", "P wave axis"));
        rules.insert("RAxis", loinc_axis("9997-8", "R wave axis"));
        rules.insert("TAxis", loinc_axis("8638-9", "T wave axis"));
        rules.insert("QOnset", scp_point("5.10.3-3", "Q Onset"));
        rules.insert("POnset", scp_point("5.10.3-1", "P Onset"));
        rules.insert("QOffset", scp_point("5.10.3-4", "Q Offset"));
        rules.insert("POffset", scp_point("5.10.3-2", "P Offset"));
        rules
    }
}

impl AnnotationRules {
    /// Creates a table with no rules
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, measurement: impl Into<String>, rule: AnnotationRule) {
        self.rules.insert(measurement.into(), rule);
    }

    pub fn get(&self, measurement: &str) -> Option<&AnnotationRule> {
        self.rules.get(measurement)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Merges `overrides` into this table; entries of `overrides` win ties
    pub fn merge(mut self, overrides: AnnotationRules) -> Self {
        self.rules.extend(overrides.rules);
        self
    }

    /// Reads an override table from a `;`-delimited file with a header row
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a row is missing a column
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            EcgDicomError::AnnotationError(format!(
                "cannot open annotation file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// Reads an override table from any `;`-delimited source
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut rules = Self::empty();
        for row in csv_reader.deserialize::<CsvRow>() {
            let (measurement, rule) = row?.into_rule();
            log::debug!("Loaded annotation rule for {}", measurement);
            rules.insert(measurement, rule);
        }
        Ok(rules)
    }
}
