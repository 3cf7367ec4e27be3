use dicom_dictionary_std::uids::EXPLICIT_VR_LITTLE_ENDIAN;
use dicom_object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::patient::SopIds;
use crate::error::{AssemblyStage, EcgDicomError, Result};
use crate::types::ConverterConfig;

/// Maximum length of a UI value
const MAX_UID_LENGTH: usize = 64;

/// Checks that a UID has DICOM UI syntax
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= MAX_UID_LENGTH
        && uid.split('.').all(|component| {
            !component.is_empty()
                && component.bytes().all(|b| b.is_ascii_digit())
                && (component == "0" || !component.starts_with('0'))
        })
}

/// Builds the file meta group for a 12-lead ECG object
///
/// # Errors
///
/// Returns a file-meta error if the configured implementation class UID
/// is not a valid UID
pub fn file_meta(config: &ConverterConfig, sop: &SopIds) -> Result<FileMetaTableBuilder> {
    if !is_valid_uid(&config.implementation_class_uid) {
        return Err(EcgDicomError::assembly(
            AssemblyStage::FileMeta,
            format!(
                "invalid implementation class UID '{}'",
                config.implementation_class_uid
            ),
        ));
    }

    Ok(FileMetaTableBuilder::new()
        .media_storage_sop_class_uid(sop.class_uid.as_str())
        .media_storage_sop_instance_uid(sop.instance_uid.as_str())
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
        .implementation_class_uid(config.implementation_class_uid.as_str())
        .implementation_version_name(config.implementation_version_name.as_str()))
}

/// Attaches the file meta group to a finished dataset
pub fn attach_meta(
    obj: InMemDicomObject,
    meta: FileMetaTableBuilder,
) -> Result<FileDicomObject<InMemDicomObject>> {
    obj.with_meta(meta)
        .map_err(|e| EcgDicomError::assembly(AssemblyStage::FileMeta, e))
}

/// Serializes a file object: 128-byte preamble, "DICM", meta group, dataset
pub fn to_bytes(file: &FileDicomObject<InMemDicomObject>) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    file.write_all(&mut buffer)
        .map_err(|e| EcgDicomError::assembly(AssemblyStage::Serialization, e))?;
    Ok(buffer)
}

/// Writes bytes to `path` through a temporary file in the same directory
///
/// The target either receives the complete content or is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let serialization = |e: std::io::Error| {
        EcgDicomError::assembly(
            AssemblyStage::Serialization,
            format!("cannot write {}: {}", path.display(), e),
        )
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(serialization)?;
    temp.write_all(bytes).map_err(serialization)?;
    temp.as_file().sync_all().map_err(serialization)?;
    temp.persist(path).map_err(|e| serialization(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("1.2.840.10008.5.1.4.1.1.9.1.1", true)]
    #[case("2.25.0", true)]
    #[case("", false)]
    #[case("1..2", false)]
    #[case("1.02", false)]
    #[case("1.2.a", false)]
    fn test_is_valid_uid(#[case] uid: &str, #[case] expected: bool) {
        assert_eq!(is_valid_uid(uid), expected);
    }

    #[test]
    fn test_uid_length_limit() {
        let long = format!("2.25.{}", "1".repeat(60));
        assert!(!is_valid_uid(&long));
    }

    #[test]
    fn test_invalid_implementation_uid_fails_file_meta() {
        let sop = SopIds {
            class_uid: "1.2.3".to_string(),
            instance_uid: "2.25.1".to_string(),
        };
        let err = file_meta(&ConverterConfig::new("not-a-uid"), &sop).unwrap_err();
        assert_eq!(err.stage(), Some(AssemblyStage::FileMeta));
    }

    #[test]
    fn test_write_atomic_replaces_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.dcm");
        std::fs::write(&target, b"old").unwrap();

        write_atomic(&target, b"new content").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new content");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("out.dcm");
        let err = write_atomic(&target, b"data").unwrap_err();
        assert_eq!(err.stage(), Some(AssemblyStage::Serialization));
        assert!(!target.exists());
    }
}
