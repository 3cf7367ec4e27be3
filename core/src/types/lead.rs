use std::fmt;

/// One of the 12 standard electrocardiographic leads
///
/// Variants are declared in canonical channel order, so the derived
/// `Ord` sorts leads the way they are laid out in a multiplex group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum Lead {
    I,
    II,
    III,
    AVR,
    AVL,
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

/// Canonical lead order of a 12-lead multiplex group
pub const CANONICAL_LEADS: [Lead; 12] = [
    Lead::I,
    Lead::II,
    Lead::III,
    Lead::AVR,
    Lead::AVL,
    Lead::AVF,
    Lead::V1,
    Lead::V2,
    Lead::V3,
    Lead::V4,
    Lead::V5,
    Lead::V6,
];

/// Leads computed from I and II rather than recorded
pub const DERIVED_LEADS: [Lead; 4] = [Lead::III, Lead::AVR, Lead::AVL, Lead::AVF];

impl Lead {
    /// Returns the lead name as written in vendor XML and DICOM code meanings
    pub fn simple_name(&self) -> &'static str {
        match self {
            Lead::I => "I",
            Lead::II => "II",
            Lead::III => "III",
            Lead::AVR => "aVR",
            Lead::AVL => "aVL",
            Lead::AVF => "aVF",
            Lead::V1 => "V1",
            Lead::V2 => "V2",
            Lead::V3 => "V3",
            Lead::V4 => "V4",
            Lead::V5 => "V5",
            Lead::V6 => "V6",
        }
    }

    /// MDC code of the channel source (coding scheme "MDC")
    pub fn mdc_code(&self) -> &'static str {
        match self {
            Lead::I => "2:1",
            Lead::II => "2:2",
            Lead::III => "2:61",
            Lead::AVR => "2:62",
            Lead::AVL => "2:63",
            Lead::AVF => "2:64",
            Lead::V1 => "2:3",
            Lead::V2 => "2:4",
            Lead::V3 => "2:5",
            Lead::V4 => "2:6",
            Lead::V5 => "2:7",
            Lead::V6 => "2:8",
        }
    }

    /// Zero-based position in the canonical channel order
    pub fn channel_index(&self) -> usize {
        *self as usize
    }

    /// Whether this lead is computed from leads I and II
    pub fn is_derived(&self) -> bool {
        DERIVED_LEADS.contains(self)
    }

    /// Parses a vendor lead identifier
    ///
    /// Matching is case-insensitive, so "AVR" and "aVR" are the same lead.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        CANONICAL_LEADS
            .iter()
            .copied()
            .find(|lead| lead.simple_name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("I", Lead::I)]
    #[case("II", Lead::II)]
    #[case("aVR", Lead::AVR)]
    #[case("AVL", Lead::AVL)]
    #[case(" V6 ", Lead::V6)]
    fn test_parse(#[case] input: &str, #[case] expected: Lead) {
        assert_eq!(Lead::parse(input), Some(expected));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Lead::parse("V7"), None);
        assert_eq!(Lead::parse(""), None);
    }

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, lead) in CANONICAL_LEADS.iter().enumerate() {
            assert_eq!(lead.channel_index(), i);
        }
        assert_eq!(Lead::AVF.mdc_code(), "2:64");
        assert_eq!(Lead::V1.mdc_code(), "2:3");
    }

    #[test]
    fn test_derived() {
        assert!(Lead::III.is_derived());
        assert!(Lead::AVF.is_derived());
        assert!(!Lead::I.is_derived());
        assert!(!Lead::V1.is_derived());
    }
}
