//! Canonical device-node resolution through `/sys/dev/block`.
//!
//! Given a device number, the kernel publishes the canonical node name in
//! `/sys/dev/block/<major>:<minor>/uevent`. That file is the authority on
//! which `/dev` entry a persistent-identifier link ultimately points at.

use std::fs;
use std::io;
use std::path::Path;

/// Fields of interest from a block-device `uevent` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeventDevice {
    pub devname: String,
    pub devtype: Option<String>,
}

/// Parse the `KEY=VALUE` lines of a `uevent` file.
///
/// Returns `None` when no `DEVNAME` is present.
pub fn parse_uevent(content: &str) -> Option<UeventDevice> {
    let mut devname = None;
    let mut devtype = None;
    for line in content.lines() {
        match line.split_once('=') {
            Some(("DEVNAME", value)) => devname = Some(value.trim().to_string()),
            Some(("DEVTYPE", value)) => devtype = Some(value.trim().to_string()),
            _ => {}
        }
    }
    Some(UeventDevice {
        devname: devname?,
        devtype,
    })
}

pub fn resolve_devnode(major: u64, minor: u64) -> io::Result<Option<UeventDevice>> {
    resolve_devnode_in(Path::new("/sys"), major, minor)
}

/// Resolve `<sys_root>/dev/block/<major>:<minor>/uevent` to its device
/// fields. The root is a parameter so tests can stage a fake tree.
pub fn resolve_devnode_in(
    sys_root: &Path,
    major: u64,
    minor: u64,
) -> io::Result<Option<UeventDevice>> {
    let uevent_path = sys_root
        .join("dev/block")
        .join(format!("{major}:{minor}"))
        .join("uevent");
    let content = fs::read_to_string(uevent_path)?;
    Ok(parse_uevent(&content))
}
