//! Catalog backed by the persistent disk-interface links in `/dev/disk/by-id`.

use super::{canonicalize, CatalogOps, DeviceRecord};
use crate::error::{HalError, HalResult};
use crate::sysfs::devnode;
use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};

/// Directory of persistent disk-interface links.
pub const DISK_BY_ID: &str = "/dev/disk/by-id";

/// Link-name prefixes that alias a device already published under its
/// transport name. Keeping them would break one-record-per-node.
const ALIAS_PREFIXES: &[&str] = &[
    "wwn-",
    "nvme-eui.",
    "dm-name-",
    "dm-uuid-",
    "lvm-pv-uuid-",
    "md-name-",
    "md-uuid-",
];

pub struct LinuxCatalog {
    by_id_root: PathBuf,
    sys_root: PathBuf,
}

impl LinuxCatalog {
    pub fn new() -> Self {
        Self::with_roots(Path::new(DISK_BY_ID), Path::new("/sys"))
    }

    /// Roots are injectable so the error paths can be exercised against
    /// staged directories.
    pub fn with_roots(by_id_root: &Path, sys_root: &Path) -> Self {
        Self {
            by_id_root: by_id_root.to_path_buf(),
            sys_root: sys_root.to_path_buf(),
        }
    }

    /// Follow one interface link down to its canonical `/dev` node.
    fn query_topology(&self, link_path: &Path) -> HalResult<PathBuf> {
        // Open shared: enumeration must not steal the claim from a
        // mounted system disk. Exclusive claims happen at write time.
        let file = fs::File::open(link_path).map_err(|source| HalError::DeviceOpenFailed {
            path: link_path.to_path_buf(),
            source,
        })?;
        let metadata = file
            .metadata()
            .map_err(|source| HalError::TopologyQueryFailed {
                path: link_path.to_path_buf(),
                detail: source.to_string(),
            })?;
        if !metadata.file_type().is_block_device() {
            return Err(HalError::TopologyQueryFailed {
                path: link_path.to_path_buf(),
                detail: "not a block device".to_string(),
            });
        }

        let rdev = metadata.rdev();
        let major = nix::sys::stat::major(rdev);
        let minor = nix::sys::stat::minor(rdev);
        let device = devnode::resolve_devnode_in(&self.sys_root, major, minor)
            .map_err(|err| HalError::TopologyQueryFailed {
                path: link_path.to_path_buf(),
                detail: format!("uevent for {major}:{minor}: {err}"),
            })?
            .ok_or_else(|| HalError::TopologyQueryFailed {
                path: link_path.to_path_buf(),
                detail: format!("no DEVNAME for {major}:{minor}"),
            })?;
        if device.devtype.as_deref() != Some("disk") {
            return Err(HalError::TopologyQueryFailed {
                path: link_path.to_path_buf(),
                detail: format!("{major}:{minor} is not a whole disk"),
            });
        }

        Ok(PathBuf::from("/dev").join(device.devname))
    }
}

impl Default for LinuxCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogOps for LinuxCatalog {
    fn enumerate(&self) -> HalResult<Vec<DeviceRecord>> {
        let entries = fs::read_dir(&self.by_id_root)
            .map_err(|source| HalError::EnumerationFailed { source })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| HalError::EnumerationFailed { source })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_partition_link(&name) || is_alias_link(&name) {
                continue;
            }
            let link_path = self.by_id_root.join(&name);
            let physical_path = self.query_topology(&link_path)?;
            records.push(DeviceRecord {
                physical_path,
                class_identifier: name,
            });
        }

        canonicalize(&mut records);
        log::debug!("catalog: {} disk(s) attached", records.len());
        Ok(records)
    }
}

/// `<identity>-partN` links address partitions, not whole disks.
fn is_partition_link(name: &str) -> bool {
    match name.rsplit_once("-part") {
        Some((_, digits)) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn is_alias_link(name: &str) -> bool {
    ALIAS_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}
