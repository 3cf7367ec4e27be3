use dicom_core::value::DataSetSequence;
use dicom_core::{dicom_value, DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use regex::Regex;
use std::sync::OnceLock;

use super::tags::{CODE_MEANING, CODE_VALUE, CODING_SCHEME_DESIGNATOR, CODING_SCHEME_VERSION};

/// A coded concept as carried by the DICOM code sequence macro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code<'a> {
    pub value: &'a str,
    pub scheme: &'a str,
    pub version: Option<&'a str>,
    pub meaning: &'a str,
}

impl<'a> Code<'a> {
    pub const fn new(value: &'a str, scheme: &'a str, meaning: &'a str) -> Self {
        Self {
            value,
            scheme,
            version: None,
            meaning,
        }
    }

    pub const fn versioned(
        value: &'a str,
        scheme: &'a str,
        version: &'a str,
        meaning: &'a str,
    ) -> Self {
        Self {
            value,
            scheme,
            version: Some(version),
            meaning,
        }
    }
}

/// Puts a single string valued attribute
pub fn put_str(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: impl AsRef<str>) {
    obj.put(DataElement::new(tag, vr, dicom_value!(Str, value.as_ref())));
}

/// Puts an unsigned short (US) attribute
pub fn put_u16(obj: &mut InMemDicomObject, tag: Tag, values: &[u16]) {
    obj.put(DataElement::new(
        tag,
        VR::US,
        PrimitiveValue::U16(values.iter().copied().collect()),
    ));
}

/// Puts an unsigned long (UL) attribute
pub fn put_u32(obj: &mut InMemDicomObject, tag: Tag, value: u32) {
    obj.put(DataElement::new(tag, VR::UL, dicom_value!(U32, [value])));
}

/// Puts a sequence attribute with the given items
pub fn put_sequence(obj: &mut InMemDicomObject, tag: Tag, items: Vec<InMemDicomObject>) {
    obj.put(DataElement::new(tag, VR::SQ, DataSetSequence::from(items)));
}

/// Builds one code sequence item
pub fn code_item(code: &Code) -> InMemDicomObject {
    let mut item = InMemDicomObject::new_empty();
    put_str(&mut item, CODE_VALUE, VR::SH, code.value);
    put_str(&mut item, CODING_SCHEME_DESIGNATOR, VR::SH, code.scheme);
    if let Some(version) = code.version {
        put_str(&mut item, CODING_SCHEME_VERSION, VR::SH, version);
    }
    put_str(&mut item, CODE_MEANING, VR::LO, code.meaning);
    item
}

/// Puts a single-item code sequence
pub fn put_code_sequence(obj: &mut InMemDicomObject, tag: Tag, code: &Code) {
    put_sequence(obj, tag, vec![code_item(code)]);
}

/// Checks that a value is a valid DICOM decimal string (DS)
///
/// DS values are at most 16 characters of fixed or exponent notation.
pub fn is_decimal_string(value: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").expect("Failed to compile regex")
    });
    let value = value.trim();
    value.len() <= 16 && re.is_match(value)
}
