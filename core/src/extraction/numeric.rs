use crate::error::{EcgDicomError, Result};

/// Parses a locale-tolerant floating point value
///
/// Accepts either "," or "." as decimal separator. With `legacy_plus_sign`
/// every "+" is rewritten to "-" before parsing, reproducing older
/// converters where "+4.88" and "-4.88" both parse as -4.88.
///
/// Never fails: malformed input yields `f64::NAN`.
pub fn parse_locale_float(text: &str, legacy_plus_sign: bool) -> f64 {
    let mut normalized = text.trim().replace(',', ".");
    if legacy_plus_sign {
        normalized = normalized.replace('+', "-");
    }
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parses an optional float, returning `None` for malformed input
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Parses an integer field, naming the field on failure
///
/// # Errors
///
/// Returns [`EcgDicomError::InvalidNumber`] if the text is not an integer
pub fn parse_int(field: &str, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| EcgDicomError::InvalidNumber {
            field: field.to_string(),
            value: text.to_string(),
        })
}

/// Computes the sampling frequency from its base/exponent encoding
///
/// Both parts must parse; partial presence yields `None`.
pub fn sample_frequency(base: Option<&str>, exponent: Option<&str>) -> Option<f64> {
    let base = parse_float(base?)?;
    let exponent = parse_float(exponent?)?;
    let frequency = base * 10f64.powf(exponent);
    frequency.is_finite().then_some(frequency)
}
