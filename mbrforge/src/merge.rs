//! Boot-sector merging.
//!
//! A freshly built bootloader knows nothing about the partition layout of
//! the stick it will live on. Merging takes the code portion of the new
//! bootloader and the tail of an existing boot sector (disk signature,
//! partition entries, boot signature) and produces the sector to flash.

use crate::errors::{ForgeError, ForgeResult};
use log::info;
use mbrforge_hal::SECTOR_SIZE;
use std::fs;
use std::path::Path;

/// Bytes [0, 440) of a boot sector hold code. Everything from here to the
/// end of the sector belongs to the partition table and must survive the
/// merge untouched.
pub const BOOT_CODE_SIZE: usize = 440;

/// Splice `bootloader[..440]` with `disk_image[440..]`.
///
/// Both inputs must be exactly one sector.
pub fn merge_boot_sector(bootloader: &[u8], disk_image: &[u8]) -> ForgeResult<[u8; SECTOR_SIZE]> {
    check_sector_length("bootloader image", bootloader)?;
    check_sector_length("disk image", disk_image)?;

    let mut merged = [0u8; SECTOR_SIZE];
    merged[..BOOT_CODE_SIZE].copy_from_slice(&bootloader[..BOOT_CODE_SIZE]);
    merged[BOOT_CODE_SIZE..].copy_from_slice(&disk_image[BOOT_CODE_SIZE..]);
    Ok(merged)
}

fn check_sector_length(input: &'static str, buf: &[u8]) -> ForgeResult<()> {
    if buf.len() != SECTOR_SIZE {
        return Err(ForgeError::InvalidLength {
            input,
            expected: SECTOR_SIZE,
            actual: buf.len(),
        });
    }
    Ok(())
}

pub fn run(bootloader: &Path, disk_image: &Path, output: &Path) -> ForgeResult<()> {
    let loader_bytes = read_input(bootloader)?;
    let disk_bytes = read_input(disk_image)?;
    let merged = merge_boot_sector(&loader_bytes, &disk_bytes)?;

    fs::write(output, merged).map_err(|source| ForgeError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Merged {} + {} -> {}",
        bootloader.display(),
        disk_image.display(),
        output.display()
    );
    Ok(())
}

fn read_input(path: &Path) -> ForgeResult<Vec<u8>> {
    fs::read(path).map_err(|source| ForgeError::SourceReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
