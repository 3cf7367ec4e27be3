use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::InMemDicomObject;

use super::elements::{put_code_sequence, put_sequence, put_str, put_u16, put_u32, Code};
use super::tags::*;
use crate::diagnostics::Diagnostics;
use crate::error::{AssemblyStage, EcgDicomError, Result};
use crate::types::{Lead, WaveformKind, WaveformSet, CANONICAL_LEADS};

const SOURCE: &str = AssemblyStage::Waveform.simple_name();

pub const CHANNEL_COUNT: u16 = CANONICAL_LEADS.len() as u16;
pub const BITS_ALLOCATED: u16 = 16;

/// Channel sensitivity unit: microvolt
pub const MICROVOLT: Code<'static> = Code::versioned("uV", "UCUM", "1.4", "microvolt");

/// Writes one multiplex group per present waveform kind, rhythm first
///
/// # Errors
///
/// Returns a waveform-stage error if a lead contains NaN samples or the
/// leads of one kind differ in length
pub fn add_waveforms(
    obj: &mut InMemDicomObject,
    rhythm: Option<&WaveformSet>,
    median: Option<&WaveformSet>,
    sample_frequency: Option<f64>,
    diag: &mut Diagnostics,
) -> Result<()> {
    if sample_frequency.is_none() {
        diag.warn(SOURCE, "Sample frequency unknown; SamplingFrequency left empty");
    }

    let mut groups = Vec::new();
    for set in [rhythm, median].into_iter().flatten() {
        if let Some(group) = multiplex_group(set, sample_frequency, diag)? {
            groups.push(group);
        }
    }
    if groups.is_empty() {
        diag.warn(SOURCE, "No waveform data to store; WaveformSequence is empty");
    }

    put_sequence(obj, WAVEFORM_SEQUENCE, groups);
    Ok(())
}

fn multiplex_group(
    set: &WaveformSet,
    sample_frequency: Option<f64>,
    diag: &mut Diagnostics,
) -> Result<Option<InMemDicomObject>> {
    let kind = set.kind();
    let Some(sample_count) = CANONICAL_LEADS
        .iter()
        .find_map(|&lead| set.samples(lead))
        .map(<[f64]>::len)
    else {
        diag.warn(SOURCE, format!("{} waveform has no known leads; skipped", kind));
        return Ok(None);
    };

    let mut columns = Vec::with_capacity(CANONICAL_LEADS.len());
    for lead in CANONICAL_LEADS {
        let column = match set.samples(lead) {
            Some(samples) if samples.len() != sample_count => {
                return Err(EcgDicomError::assembly(
                    AssemblyStage::Waveform,
                    format!(
                        "lead {} of {} waveform has {} samples, expected {}",
                        lead,
                        kind,
                        samples.len(),
                        sample_count
                    ),
                ));
            }
            Some(samples) => quantize(samples, lead, kind, diag)?,
            None => {
                log::debug!("Lead {} missing from {} waveform; zero-filled", lead, kind);
                vec![0; sample_count]
            }
        };
        columns.push(column);
    }

    let number_of_samples = u32::try_from(sample_count).map_err(|_| {
        EcgDicomError::assembly(
            AssemblyStage::Waveform,
            format!("{} waveform has too many samples ({})", kind, sample_count),
        )
    })?;

    let mut group = InMemDicomObject::new_empty();
    put_str(&mut group, MULTIPLEX_GROUP_TIME_OFFSET, VR::DS, "0");
    put_str(&mut group, TRIGGER_TIME_OFFSET, VR::DS, "0");
    put_str(&mut group, MULTIPLEX_GROUP_LABEL, VR::SH, kind.group_label());
    put_str(&mut group, WAVEFORM_ORIGINALITY, VR::CS, "ORIGINAL");
    put_u16(&mut group, NUMBER_OF_WAVEFORM_CHANNELS, &[CHANNEL_COUNT]);
    put_u32(&mut group, NUMBER_OF_WAVEFORM_SAMPLES, number_of_samples);
    put_str(
        &mut group,
        SAMPLING_FREQUENCY,
        VR::DS,
        sample_frequency.map(format_ds).unwrap_or_default(),
    );
    put_u16(&mut group, WAVEFORM_BITS_ALLOCATED, &[BITS_ALLOCATED]);
    put_str(&mut group, WAVEFORM_SAMPLE_INTERPRETATION, VR::CS, "SS");

    let channels = CANONICAL_LEADS
        .iter()
        .enumerate()
        .map(|(index, &lead)| channel_definition(set, lead, index))
        .collect();
    put_sequence(&mut group, CHANNEL_DEFINITION_SEQUENCE, channels);

    group.put(DataElement::new(
        WAVEFORM_DATA,
        VR::OW,
        PrimitiveValue::U8(interleave(&columns, sample_count).into()),
    ));

    Ok(Some(group))
}

fn channel_definition(set: &WaveformSet, lead: Lead, index: usize) -> InMemDicomObject {
    let filter = set.filter(lead);
    let mut channel = InMemDicomObject::new_empty();
    put_str(&mut channel, WAVEFORM_CHANNEL_NUMBER, VR::IS, (index + 1).to_string());
    put_str(&mut channel, CHANNEL_LABEL, VR::SH, format!("Lead_{}", lead.simple_name()));
    put_str(&mut channel, CHANNEL_STATUS, VR::CS, "OK");
    put_code_sequence(
        &mut channel,
        CHANNEL_SOURCE_SEQUENCE,
        &Code::new(lead.mdc_code(), "MDC", lead.simple_name()),
    );
    put_str(&mut channel, CHANNEL_SENSITIVITY, VR::DS, "1");
    put_code_sequence(&mut channel, CHANNEL_SENSITIVITY_UNITS_SEQUENCE, &MICROVOLT);
    put_str(&mut channel, CHANNEL_SENSITIVITY_CORRECTION_FACTOR, VR::DS, "1");
    put_str(&mut channel, CHANNEL_BASELINE, VR::DS, "0");
    put_str(&mut channel, CHANNEL_SAMPLE_SKEW, VR::DS, "0");
    put_u16(&mut channel, WAVEFORM_BITS_STORED, &[BITS_ALLOCATED]);
    // High-pass cutoff is the lower band edge, low-pass the upper one
    put_str(&mut channel, FILTER_LOW_FREQUENCY, VR::DS, &filter.high_pass);
    put_str(&mut channel, FILTER_HIGH_FREQUENCY, VR::DS, &filter.low_pass);
    put_str(&mut channel, NOTCH_FILTER_FREQUENCY, VR::DS, &filter.ac_filter);
    channel
}

/// Converts scaled samples to stored 16-bit values
///
/// Values are multiplied by 1000 and truncated toward zero. Out-of-range
/// values are clamped, with one warning per lead.
fn quantize(samples: &[f64], lead: Lead, kind: WaveformKind, diag: &mut Diagnostics) -> Result<Vec<i16>> {
    if samples.iter().any(|v| v.is_nan()) {
        return Err(EcgDicomError::assembly(
            AssemblyStage::Waveform,
            format!("lead {} of {} waveform contains NaN samples", lead, kind),
        ));
    }

    let mut clamped = 0usize;
    let values = samples
        .iter()
        .map(|v| {
            let scaled = (v * 1000.0).trunc();
            if scaled > f64::from(i16::MAX) || scaled < f64::from(i16::MIN) {
                clamped += 1;
            }
            scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
        })
        .collect();

    if clamped > 0 {
        diag.warn(
            SOURCE,
            format!(
                "{} samples of lead {} ({} waveform) exceed the 16-bit range and were clamped",
                clamped, lead, kind
            ),
        );
    }
    Ok(values)
}

/// Lays out channel columns sample-major as little-endian bytes
fn interleave(columns: &[Vec<i16>], sample_count: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(sample_count * columns.len() * 2);
    for sample in 0..sample_count {
        for column in columns {
            bytes.extend_from_slice(&column[sample].to_le_bytes());
        }
    }
    bytes
}

/// Formats a decimal string (DS) value within its 16 character limit
fn format_ds(value: f64) -> String {
    let plain = value.to_string();
    if plain.len() <= 16 {
        return plain;
    }
    let mut exponent = std::iter::once(format!("{:e}", value)).chain(
        (0..=15usize)
            .rev()
            .map(|precision| format!("{:.*e}", precision, value)),
    );
    // Fixed notation of magnitudes this large never fits
    if value.abs() >= 1e15 {
        return exponent
            .find(|s| s.len() <= 16)
            .unwrap_or_else(|| format!("{:.0e}", value));
    }
    (0..=15usize)
        .rev()
        .map(|precision| format!("{:.*}", precision, value))
        .find(|s| s.len() <= 16)
        .or_else(|| exponent.find(|s| s.len() <= 16))
        .unwrap_or_else(|| format!("{:.0e}", value))
}
