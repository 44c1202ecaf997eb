//! `MountRecord`: a thin object wrapping a kernel device-mount record,
//! grounded on `original_source/src/udisksmount.c`.

use std::cmp::Ordering;

/// A single `{device_number, mount_path}` pair, as reported for one
/// currently-mounted device.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MountRecord {
    pub device_number: u64,
    pub mount_path: String,
}

impl MountRecord {
    pub fn new(device_number: u64, mount_path: impl Into<String>) -> Self {
        Self {
            device_number,
            mount_path: mount_path.into(),
        }
    }
}

/// Orders first by mount path, **descending** lexicographically, then by
/// device number, ascending — the exact two-key comparator of
/// `udisks_mount_compare`.
impl Ord for MountRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .mount_path
            .cmp(&self.mount_path)
            .then_with(|| self.device_number.cmp(&other.device_number))
    }
}

impl PartialOrd for MountRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
