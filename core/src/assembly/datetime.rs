use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Accepted vendor date layouts, tried in order
const DATE_FORMATS: [&str; 3] = ["%m-%d-%Y", "%Y-%m-%d", "%Y%m%d"];

/// Accepted vendor time layouts, tried in order
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H%M%S"];

pub const DICOM_DATE: &str = "%Y%m%d";
pub const DICOM_TIME: &str = "%H%M%S";
pub const DICOM_DATE_TIME: &str = "%Y%m%d%H%M%S";

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

/// Formats a vendor date as DICOM DA, or "" if absent or unparseable
pub fn format_date(text: Option<&str>) -> String {
    text.and_then(parse_date)
        .map(|d| d.format(DICOM_DATE).to_string())
        .unwrap_or_default()
}

/// Formats a vendor time as DICOM TM, or "" if absent or unparseable
pub fn format_time(text: Option<&str>) -> String {
    text.and_then(parse_time)
        .map(|t| t.format(DICOM_TIME).to_string())
        .unwrap_or_default()
}

/// Combines a vendor date and time into DICOM DT
///
/// Returns "" unless both parts parse.
pub fn format_datetime(date: Option<&str>, time: Option<&str>) -> String {
    match (date.and_then(parse_date), time.and_then(parse_time)) {
        (Some(d), Some(t)) => d.and_time(t).format(DICOM_DATE_TIME).to_string(),
        _ => String::new(),
    }
}

/// Computes when the recording ended
///
/// The end is the acquisition start plus the longest declared rhythm
/// duration (`sample_count / frequency` seconds), kept to microsecond
/// precision before formatting.
///
/// # Errors
///
/// Returns a description of the first missing or unusable input
pub fn procedure_end(
    date: Option<&str>,
    time: Option<&str>,
    sample_count: Option<u32>,
    frequency: Option<f64>,
) -> Result<NaiveDateTime, String> {
    let date = date.ok_or("acquisition date is missing")?;
    let time = time.ok_or("acquisition time is missing")?;
    let start_date = parse_date(date).ok_or_else(|| format!("unparseable acquisition date '{}'", date))?;
    let start_time = parse_time(time).ok_or_else(|| format!("unparseable acquisition time '{}'", time))?;
    let sample_count = sample_count.ok_or("no rhythm sample count available")?;
    let frequency = frequency.ok_or("sample frequency is missing")?;
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(format!("invalid sample frequency {}", frequency));
    }

    let micros = (f64::from(sample_count) / frequency * 1_000_000.0).round() as i64;
    start_date
        .and_time(start_time)
        .checked_add_signed(Duration::microseconds(micros))
        .ok_or_else(|| "procedure end is out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("03-15-2024"), "20240315")]
    #[case(Some("2024-03-15"), "20240315")]
    #[case(Some("20240315"), "20240315")]
    #[case(Some(" 12-31-1999 "), "19991231")]
    #[case(Some("15-03-2024"), "")]
    #[case(Some("yesterday"), "")]
    #[case(None, "")]
    fn test_format_date(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_date(input), expected);
    }

    #[rstest]
    #[case(Some("08:30:00"), "083000")]
    #[case(Some("235959"), "235959")]
    #[case(Some("8:5"), "")]
    #[case(Some("25:00:00"), "")]
    #[case(None, "")]
    fn test_format_time(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_time(input), expected);
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime(Some("03-15-2024"), Some("08:30:00")),
            "20240315083000"
        );
        assert_eq!(format_datetime(Some("03-15-2024"), None), "");
        assert_eq!(format_datetime(None, Some("08:30:00")), "");
    }

    #[test]
    fn test_procedure_end_adds_recording_length() {
        let end = procedure_end(Some("2024-03-15"), Some("08:30:00"), Some(5000), Some(500.0)).unwrap();
        assert_eq!(end.format(DICOM_DATE).to_string(), "20240315");
        assert_eq!(end.format(DICOM_TIME).to_string(), "083010");
    }

    #[test]
    fn test_procedure_end_crosses_midnight() {
        let end = procedure_end(Some("12-31-2023"), Some("23:59:55"), Some(5000), Some(500.0)).unwrap();
        assert_eq!(end.format(DICOM_DATE_TIME).to_string(), "20240101000005");
    }

    #[test]
    fn test_procedure_end_failures() {
        assert!(procedure_end(None, Some("08:30:00"), Some(5000), Some(500.0)).is_err());
        assert!(procedure_end(Some("2024-03-15"), Some("08:30:00"), None, Some(500.0)).is_err());
        assert!(procedure_end(Some("2024-03-15"), Some("08:30:00"), Some(5000), None).is_err());
        let err = procedure_end(Some("2024-03-15"), Some("08:30:00"), Some(5000), Some(0.0)).unwrap_err();
        assert!(err.contains("invalid sample frequency"));
    }
}
