use crate::diagnostics::Diagnostics;
use crate::error::{EcgDicomError, Result};
use crate::types::{Lead, WaveformSet};

/// Adds the derived limb leads III, aVR, aVL and aVF to a waveform set
///
/// Uses Einthoven/Goldberger relations on leads I and II:
///
/// - III = II − I
/// - aVR = −(I + II) / 2
/// - aVL = I − II / 2
/// - aVF = II − I / 2
///
/// Derived leads take the filter settings of their source lead
/// (III and aVF from II, aVR and aVL from I).
///
/// # Returns
///
/// `Ok(true)` if the leads were derived, `Ok(false)` if I or II is missing
/// (a warning is recorded in that case)
///
/// # Errors
///
/// Returns an error if leads I and II have different lengths
pub fn derive_limb_leads(set: &mut WaveformSet, diag: &mut Diagnostics) -> Result<bool> {
    let (lead_i, lead_ii) = match (set.samples(Lead::I), set.samples(Lead::II)) {
        (Some(i), Some(ii)) => (i.to_vec(), ii.to_vec()),
        _ => {
            diag.warn(
                "extract",
                format!(
                    "Leads I and II are required to derive III, aVR, aVL, aVF for {} waveform",
                    set.kind()
                ),
            );
            return Ok(false);
        }
    };

    if lead_i.len() != lead_ii.len() {
        return Err(EcgDicomError::WaveformError(format!(
            "{} leads I and II differ in length ({} vs {} samples)",
            set.kind(),
            lead_i.len(),
            lead_ii.len()
        )));
    }

    let combine = |f: fn(f64, f64) -> f64| -> Vec<f64> {
        lead_i
            .iter()
            .zip(&lead_ii)
            .map(|(&i, &ii)| f(i, ii))
            .collect()
    };

    let recorded: Vec<Lead> = set.leads().filter(Lead::is_derived).collect();
    for lead in recorded {
        diag.info(
            "extract",
            format!("Recorded lead {} of {} waveform replaced by derived values", lead, set.kind()),
        );
    }

    let filter_i = set.filter(Lead::I);
    let filter_ii = set.filter(Lead::II);

    set.insert_derived(Lead::III, combine(|i, ii| ii - i), filter_ii.clone());
    set.insert_derived(Lead::AVR, combine(|i, ii| -(i + ii) / 2.0), filter_i.clone());
    set.insert_derived(Lead::AVL, combine(|i, ii| i - ii / 2.0), filter_i);
    set.insert_derived(Lead::AVF, combine(|i, ii| ii - i / 2.0), filter_ii);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LeadFilterInfo, WaveformKind, DERIVED_LEADS};

    fn filter(hp: &str) -> LeadFilterInfo {
        LeadFilterInfo {
            high_pass: hp.to_string(),
            ..LeadFilterInfo::default()
        }
    }

    fn set_with(kind: WaveformKind, i: Option<Vec<f64>>, ii: Option<Vec<f64>>) -> WaveformSet {
        let mut set = WaveformSet::new(kind);
        if let Some(i) = i {
            let n = i.len() as u32;
            set.insert_lead(Lead::I, i, filter("0.05"), n);
        }
        if let Some(ii) = ii {
            let n = ii.len() as u32;
            set.insert_lead(Lead::II, ii, filter("0.16"), n);
        }
        set
    }

    #[test]
    fn test_derived_values() {
        for kind in [WaveformKind::Rhythm, WaveformKind::Median] {
            let i = vec![1.0, -2.0, 0.5, 0.0];
            let ii = vec![3.0, 4.0, -1.5, 0.25];
            let mut set = set_with(kind, Some(i.clone()), Some(ii.clone()));
            let mut diag = Diagnostics::new();

            assert!(derive_limb_leads(&mut set, &mut diag).unwrap());
            assert!(diag.is_empty());

            let iii = set.samples(Lead::III).unwrap();
            for k in 0..i.len() {
                assert_eq!(iii[k], ii[k] - i[k]);
            }
            assert_eq!(set.samples(Lead::AVR).unwrap()[0], -2.0);
            assert_eq!(set.samples(Lead::AVL).unwrap()[0], -0.5);
            assert_eq!(set.samples(Lead::AVF).unwrap()[0], 2.5);
        }
    }

    #[test]
    fn test_filter_inheritance() {
        let mut set = set_with(WaveformKind::Rhythm, Some(vec![0.0]), Some(vec![0.0]));
        derive_limb_leads(&mut set, &mut Diagnostics::new()).unwrap();

        assert_eq!(set.filter(Lead::III).high_pass, "0.16");
        assert_eq!(set.filter(Lead::AVR).high_pass, "0.05");
        assert_eq!(set.filter(Lead::AVL).high_pass, "0.05");
        assert_eq!(set.filter(Lead::AVF).high_pass, "0.16");
        assert_eq!(set.sample_count(Lead::III), None);
    }

    #[test]
    fn test_missing_lead_skips_derivation() {
        for (i, ii) in [(Some(vec![1.0]), None), (None, Some(vec![1.0])), (None, None)] {
            let mut set = set_with(WaveformKind::Median, i, ii);
            let mut diag = Diagnostics::new();

            assert!(!derive_limb_leads(&mut set, &mut diag).unwrap());
            for lead in DERIVED_LEADS {
                assert!(!set.contains(lead));
            }
            assert!(diag.mentions("Median waveform"));
        }
    }

    #[test]
    fn test_recorded_limb_leads_are_replaced() {
        let mut set = set_with(WaveformKind::Rhythm, Some(vec![1.0]), Some(vec![3.0]));
        set.insert_lead(Lead::III, vec![99.0], filter("0.05"), 1);
        let mut diag = Diagnostics::new();

        assert!(derive_limb_leads(&mut set, &mut diag).unwrap());
        assert_eq!(set.samples(Lead::III).unwrap(), &[2.0]);
        assert!(diag.mentions("Recorded lead III of Rhythm waveform replaced"));
        assert_eq!(diag.at_least(crate::diagnostics::Severity::Warning).count(), 0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let mut set = set_with(
            WaveformKind::Rhythm,
            Some(vec![1.0, 2.0]),
            Some(vec![1.0]),
        );
        let err = derive_limb_leads(&mut set, &mut Diagnostics::new()).unwrap_err();
        assert!(err.to_string().contains("differ in length"));
    }
}
