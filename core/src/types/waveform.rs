use super::Lead;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of waveform block in a vendor record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum WaveformKind {
    /// Continuous rhythm strip
    Rhythm,
    /// Representative averaged beat
    Median,
}

impl WaveformKind {
    /// Tag used in the vendor `WaveformType` element
    pub fn simple_name(&self) -> &'static str {
        match self {
            WaveformKind::Rhythm => "Rhythm",
            WaveformKind::Median => "Median",
        }
    }

    /// Multiplex group label written to DICOM
    pub fn group_label(&self) -> &'static str {
        match self {
            WaveformKind::Rhythm => "RHYTHM",
            WaveformKind::Median => "MEDIAN",
        }
    }

    /// Parses the vendor `WaveformType` text; other tags yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Rhythm" => Some(WaveformKind::Rhythm),
            "Median" => Some(WaveformKind::Median),
            _ => None,
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Filter settings applied to a lead, as formatted numeric strings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct LeadFilterInfo {
    pub high_pass: String,
    pub low_pass: String,
    pub ac_filter: String,
}

impl Default for LeadFilterInfo {
    fn default() -> Self {
        Self {
            high_pass: "0".to_string(),
            low_pass: "0".to_string(),
            ac_filter: "0".to_string(),
        }
    }
}

/// Samples, filter settings and declared sample counts of one waveform block
///
/// Sample values are the decoded integers scaled by the lead's amplitude
/// factor and 0.001. A lead whose amplitude factor could not be parsed
/// holds NaN samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSet {
    kind: WaveformKind,
    leads: BTreeMap<Lead, Vec<f64>>,
    filters: BTreeMap<Lead, LeadFilterInfo>,
    sample_counts: BTreeMap<Lead, u32>,
}

impl WaveformSet {
    /// Creates an empty set of the given kind
    pub fn new(kind: WaveformKind) -> Self {
        Self {
            kind,
            leads: BTreeMap::new(),
            filters: BTreeMap::new(),
            sample_counts: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> WaveformKind {
        self.kind
    }

    /// Adds a decoded lead with its block filter settings and declared count
    pub fn insert_lead(
        &mut self,
        lead: Lead,
        samples: Vec<f64>,
        filter: LeadFilterInfo,
        sample_count: u32,
    ) {
        self.leads.insert(lead, samples);
        self.filters.insert(lead, filter);
        self.sample_counts.insert(lead, sample_count);
    }

    /// Adds a computed lead; derived leads carry no declared sample count
    pub(crate) fn insert_derived(&mut self, lead: Lead, samples: Vec<f64>, filter: LeadFilterInfo) {
        self.leads.insert(lead, samples);
        self.filters.insert(lead, filter);
    }

    pub fn samples(&self, lead: Lead) -> Option<&[f64]> {
        self.leads.get(&lead).map(Vec::as_slice)
    }

    pub fn contains(&self, lead: Lead) -> bool {
        self.leads.contains_key(&lead)
    }

    /// Filter settings of a lead, defaulting to "0" for every value
    pub fn filter(&self, lead: Lead) -> LeadFilterInfo {
        self.filters.get(&lead).cloned().unwrap_or_default()
    }

    /// Declared total sample count (LeadSampleCountTotal) of a lead
    pub fn sample_count(&self, lead: Lead) -> Option<u32> {
        self.sample_counts.get(&lead).copied()
    }

    /// Largest declared sample count across leads
    pub fn max_sample_count(&self) -> Option<u32> {
        self.sample_counts.values().copied().max()
    }

    /// Present leads in canonical order
    pub fn leads(&self) -> impl Iterator<Item = Lead> + '_ {
        self.leads.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(WaveformKind::parse("Rhythm"), Some(WaveformKind::Rhythm));
        assert_eq!(WaveformKind::parse("Median"), Some(WaveformKind::Median));
        assert_eq!(WaveformKind::parse("Unknown"), None);
        assert_eq!(WaveformKind::Median.group_label(), "MEDIAN");
    }

    #[test]
    fn test_filter_defaults_to_zero() {
        let set = WaveformSet::new(WaveformKind::Rhythm);
        let filter = set.filter(Lead::V3);
        assert_eq!(filter.high_pass, "0");
        assert_eq!(filter.low_pass, "0");
        assert_eq!(filter.ac_filter, "0");
    }

    #[test]
    fn test_leads_iterate_in_canonical_order() {
        let mut set = WaveformSet::new(WaveformKind::Rhythm);
        set.insert_lead(Lead::V1, vec![0.0], LeadFilterInfo::default(), 1);
        set.insert_lead(Lead::I, vec![0.0], LeadFilterInfo::default(), 1);
        set.insert_lead(Lead::II, vec![0.0], LeadFilterInfo::default(), 5000);

        let leads: Vec<_> = set.leads().collect();
        assert_eq!(leads, vec![Lead::I, Lead::II, Lead::V1]);
        assert_eq!(set.max_sample_count(), Some(5000));
    }
}
