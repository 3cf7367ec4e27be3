use crate::diagnostics::Diagnostics;
use crate::error::{EcgDicomError, Result};
use crate::types::{Lead, LeadFilterInfo, WaveformKind, WaveformSet};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use roxmltree::Node;

use super::leads::derive_limb_leads;
use super::numeric::{parse_int, parse_locale_float};
use super::xml::{
    child, child_text, child_text_or, children, element_text, find_all, AC_FILTER,
    HIGH_PASS_FILTER, LEAD_AMPLITUDE_UNITS_PER_BIT, LEAD_DATA, LEAD_ID, LEAD_SAMPLE_COUNT_TOTAL,
    LOW_PASS_FILTER, WAVEFORM, WAVEFORM_DATA, WAVEFORM_TYPE,
};

const SOURCE: &str = "extract";

/// Decodes a base64 payload of little-endian signed 16-bit samples
///
/// Whitespace inside the payload (line breaks from XML pretty printing)
/// is ignored.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64 or decodes to an
/// odd number of bytes
pub fn decode_samples(payload: &str) -> Result<Vec<i16>> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    if bytes.len() % 2 != 0 {
        return Err(EcgDicomError::WaveformError(format!(
            "payload of {} bytes is not a whole number of 16-bit samples",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Scales raw samples by the lead's amplitude factor and 0.001
///
/// A NaN factor turns every sample into NaN.
pub fn scale_samples(raw: &[i16], amplitude_units_per_bit: f64) -> Vec<f64> {
    raw.iter()
        .map(|&v| f64::from(v) * amplitude_units_per_bit * 0.001)
        .collect()
}

/// Collects the Rhythm and Median waveform blocks of a record
///
/// Blocks with any other `WaveformType` are ignored. A missing kind is
/// recorded as a warning; derived limb leads are added to each kind found.
pub fn extract_waveforms(
    root: Node,
    legacy_plus_sign: bool,
    diag: &mut Diagnostics,
) -> Result<(Option<WaveformSet>, Option<WaveformSet>)> {
    let mut rhythm: Option<WaveformSet> = None;
    let mut median: Option<WaveformSet> = None;

    for block in find_all(root, WAVEFORM) {
        let Some(kind) = child_text(block, WAVEFORM_TYPE).and_then(|t| WaveformKind::parse(&t))
        else {
            continue;
        };

        let set = match kind {
            WaveformKind::Rhythm => rhythm.get_or_insert_with(|| WaveformSet::new(kind)),
            WaveformKind::Median => median.get_or_insert_with(|| WaveformSet::new(kind)),
        };
        read_block(block, set, legacy_plus_sign, diag)?;
    }

    for (kind, set) in [
        (WaveformKind::Rhythm, rhythm.as_mut()),
        (WaveformKind::Median, median.as_mut()),
    ] {
        match set {
            Some(set) => {
                derive_limb_leads(set, diag)?;
            }
            None => diag.warn(SOURCE, format!("No '{}' waveform found in the XML", kind)),
        }
    }

    Ok((rhythm, median))
}

/// Reads every `LeadData` of one block into the set
///
/// Filter settings live at block level and apply to every lead of the block.
fn read_block(
    block: Node,
    set: &mut WaveformSet,
    legacy_plus_sign: bool,
    diag: &mut Diagnostics,
) -> Result<()> {
    let filter = LeadFilterInfo {
        high_pass: child_text_or(block, HIGH_PASS_FILTER, "0"),
        low_pass: child_text_or(block, LOW_PASS_FILTER, "0"),
        ac_filter: child_text_or(block, AC_FILTER, "0"),
    };

    for lead_node in children(block, LEAD_DATA) {
        let lead_id = child_text(lead_node, LEAD_ID)
            .ok_or_else(|| EcgDicomError::MissingElement(format!("{}/{}", LEAD_DATA, LEAD_ID)))?;
        let Some(lead) = Lead::parse(&lead_id) else {
            diag.warn(
                SOURCE,
                format!("Ignoring unknown lead '{}' in {} waveform", lead_id, set.kind()),
            );
            continue;
        };

        let amplitude_text = child(lead_node, LEAD_AMPLITUDE_UNITS_PER_BIT)
            .map(element_text)
            .ok_or_else(|| {
                EcgDicomError::MissingElement(format!(
                    "{} of lead {}",
                    LEAD_AMPLITUDE_UNITS_PER_BIT, lead
                ))
            })?;
        let amplitude = parse_locale_float(&amplitude_text, legacy_plus_sign);
        if amplitude.is_nan() {
            diag.warn(
                SOURCE,
                format!(
                    "Malformed {} '{}' for lead {} ({}); samples set to NaN",
                    LEAD_AMPLITUDE_UNITS_PER_BIT,
                    amplitude_text.trim(),
                    lead,
                    set.kind()
                ),
            );
        }

        let payload = child(lead_node, WAVEFORM_DATA)
            .map(element_text)
            .ok_or_else(|| {
                EcgDicomError::MissingElement(format!("{} of lead {}", WAVEFORM_DATA, lead))
            })?;
        let raw = decode_samples(&payload).map_err(|e| {
            EcgDicomError::WaveformError(format!("lead {} ({}): {}", lead, set.kind(), e))
        })?;

        let sample_count = match child_text(lead_node, LEAD_SAMPLE_COUNT_TOTAL) {
            Some(text) => {
                let count = parse_int(LEAD_SAMPLE_COUNT_TOTAL, &text)?;
                u32::try_from(count).map_err(|_| EcgDicomError::InvalidNumber {
                    field: LEAD_SAMPLE_COUNT_TOTAL.to_string(),
                    value: text.clone(),
                })?
            }
            None => {
                diag.info(
                    SOURCE,
                    format!(
                        "No {} for lead {} ({}); using the {} decoded samples",
                        LEAD_SAMPLE_COUNT_TOTAL,
                        lead,
                        set.kind(),
                        raw.len()
                    ),
                );
                u32::try_from(raw.len()).map_err(|_| {
                    EcgDicomError::WaveformError(format!(
                        "lead {} ({}) has too many samples ({})",
                        lead,
                        set.kind(),
                        raw.len()
                    ))
                })?
            }
        };

        log::debug!(
            "Decoded {} lead {}: {} samples (declared {})",
            set.kind(),
            lead,
            raw.len(),
            sample_count
        );
        set.insert_lead(
            lead,
            scale_samples(&raw, amplitude),
            filter.clone(),
            sample_count,
        );
    }

    Ok(())
}
