//! Boot-sector dump.

use crate::errors::ForgeResult;
use log::info;
use mbrforge_hal::{BlockDevice, OpenMode};
use std::io::Write;
use std::path::Path;

/// Where `dump` reads from when no `--device` is given: the usual node
/// for the first USB stick on a machine with a single fixed disk.
pub const DEFAULT_DEVICE: &str = "/dev/sdb";

/// Read one sector from `device` and stream the raw bytes to `out`.
pub fn run<W: Write>(device: &Path, out: &mut W) -> ForgeResult<()> {
    let mut handle = BlockDevice::open_exclusive(device, OpenMode::ReadOnly)?;
    let sector = handle.read_sector()?;
    out.write_all(&sector)?;
    out.flush()?;

    info!("Dumped {} bytes from {}", sector.len(), device.display());
    Ok(())
}
