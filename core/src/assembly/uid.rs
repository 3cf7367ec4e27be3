//! UID generation
//!
//! Instance UIDs are UUID-derived under the `2.25` root. The implementation
//! class UID is a one-way digest of the host's hardware identifier and name,
//! so the host details themselves never appear in generated files.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Root for UUID-derived UIDs (ISO/IEC 9834-8)
pub const UUID_ROOT: &str = "2.25";

// 10^38: reduced digests are shifted into [10^38, 2 * 10^38), always 39 digits
const DIGEST_FLOOR: u128 = 100_000_000_000_000_000_000_000_000_000_000_000_000;

/// Host identity used to derive the implementation class UID
///
/// Has no `Debug` impl; the raw identifiers must not reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct MachineFingerprint {
    hardware_id: String,
    hostname: String,
}

impl MachineFingerprint {
    pub fn new(hardware_id: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            hardware_id: hardware_id.into(),
            hostname: hostname.into(),
        }
    }

    /// Reads the fingerprint of the running host
    ///
    /// The hardware identifier is `/etc/machine-id`, falling back to the
    /// first non-loopback interface MAC under `/sys/class/net`, else
    /// "unknown". Detection never fails.
    pub fn detect() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());
        let hardware_id = read_machine_id(Path::new("/etc/machine-id"))
            .or_else(|| first_mac_address(Path::new("/sys/class/net")))
            .unwrap_or_else(|| "unknown".to_string());
        Self::new(hardware_id, hostname)
    }

    fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.hardware_id.as_bytes());
        hasher.update(b"-");
        hasher.update(self.hostname.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

/// Derives the implementation class UID from a machine fingerprint
///
/// The result is stable for a host and always 44 characters long.
///
/// # Example
///
/// ```
/// use ecgdicom_core::assembly::uid::{implementation_uid, MachineFingerprint};
///
/// let uid = implementation_uid(&MachineFingerprint::new("abc123", "ward-pc"));
/// assert!(uid.starts_with("2.25.1"));
/// assert_eq!(uid.len(), 44);
/// ```
pub fn implementation_uid(fingerprint: &MachineFingerprint) -> String {
    let digest = fingerprint.digest();
    let mut head = [0u8; 16];
    head.copy_from_slice(&digest[..16]);
    let reduced = u128::from_be_bytes(head) % DIGEST_FLOOR + DIGEST_FLOOR;
    format!("{}.{}", UUID_ROOT, reduced)
}

/// Generates a fresh globally unique UID under the `2.25` root
pub fn generate_uid() -> String {
    format!("{}.{}", UUID_ROOT, Uuid::new_v4().as_u128())
}

fn read_machine_id(path: &Path) -> Option<String> {
    let id = fs::read_to_string(path).ok()?;
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}

fn first_mac_address(net_dir: &Path) -> Option<String> {
    let mut interfaces: Vec<_> = fs::read_dir(net_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.file_name().map_or(false, |name| name != "lo"))
        .collect();
    interfaces.sort();

    interfaces.iter().find_map(|iface| {
        let mac = fs::read_to_string(iface.join("address")).ok()?;
        let mac = mac.trim();
        (!mac.is_empty() && mac != "00:00:00:00:00:00").then(|| mac.to_string())
    })
}
