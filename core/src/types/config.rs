use crate::assembly::uid::{implementation_uid, MachineFingerprint};

/// Run-wide settings of the converter
///
/// Built once at startup and shared by every conversion of a run. The
/// implementation class UID in particular is derived from the machine
/// fingerprint a single time rather than per file.
///
/// # Example
///
/// ```
/// use ecgdicom_core::ConverterConfig;
///
/// let config = ConverterConfig::new("2.25.123456789")
///     .with_manufacturer("Example Cardiology")
///     .legacy_plus_sign(true);
///
/// assert_eq!(config.implementation_class_uid, "2.25.123456789");
/// assert_eq!(config.manufacturer, "Example Cardiology");
/// assert!(config.legacy_plus_sign);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// ImplementationClassUID written to the file meta group
    pub implementation_class_uid: String,

    /// ImplementationVersionName written to the file meta group
    pub implementation_version_name: String,

    /// Manufacturer attribute of the generated object
    pub manufacturer: String,

    /// SpecificCharacterSet of the generated object
    pub character_set: String,

    /// Parse every "+" in amplitude factors as "-", as older converters did
    pub legacy_plus_sign: bool,
}

impl ConverterConfig {
    /// Creates a configuration with the given implementation class UID
    pub fn new(implementation_class_uid: impl Into<String>) -> Self {
        Self {
            implementation_class_uid: implementation_class_uid.into(),
            implementation_version_name: format!("ECGDICOM_{}", env!("CARGO_PKG_VERSION")),
            manufacturer: "GE HealthCare".to_string(),
            character_set: "ISO_IR 192".to_string(),
            legacy_plus_sign: false,
        }
    }

    /// Creates a configuration whose implementation class UID is derived
    /// from this machine's fingerprint
    pub fn detect() -> Self {
        let fingerprint = MachineFingerprint::detect();
        Self::new(implementation_uid(&fingerprint))
    }

    /// Builder: Set the manufacturer attribute
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    /// Builder: Set the specific character set
    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set = character_set.into();
        self
    }

    /// Builder: Set the implementation version name
    pub fn with_implementation_version_name(mut self, name: impl Into<String>) -> Self {
        self.implementation_version_name = name.into();
        self
    }

    /// Builder: Enable legacy "+" → "-" amplitude parsing
    pub fn legacy_plus_sign(mut self, legacy: bool) -> Self {
        self.legacy_plus_sign = legacy;
        self
    }
}
