//! Physical-disk catalog.
//!
//! A catalog answers one question: which disk-class devices are attached
//! right now, and under which identities? Results are built fresh on
//! every call; callers that need consistency across display, resolution,
//! and writing must hold on to a single snapshot.

mod fake_catalog;
mod linux_catalog;

pub use fake_catalog::FakeCatalog;
pub use linux_catalog::{LinuxCatalog, DISK_BY_ID};

use crate::error::HalResult;
use std::path::PathBuf;

/// One attached disk, as a (canonical node, stable identity) pair.
///
/// `physical_path` is the kernel's node (`/dev/sdb`); the letter is
/// assigned at detection time and does not survive reboots or replugs.
/// `class_identifier` encodes bus, model, and serial and stays with the
/// hardware.
///
/// Field order gives the derived `Ord` the catalog's canonical sort:
/// path first, identifier second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeviceRecord {
    pub physical_path: PathBuf,
    pub class_identifier: String,
}

/// Enumeration of attached disk-class devices.
pub trait CatalogOps {
    /// Snapshot the attached disks in canonical order.
    ///
    /// All-or-nothing: a failure on any one device aborts the whole pass.
    fn enumerate(&self) -> HalResult<Vec<DeviceRecord>>;
}

/// Canonical order plus one record per physical node.
pub(crate) fn canonicalize(records: &mut Vec<DeviceRecord>) {
    records.sort();
    records.dedup_by(|a, b| a.physical_path == b.physical_path);
}
