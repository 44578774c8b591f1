//! Destructive flashing behind the write guard.
//!
//! Both entry points (interactive `write`, scripted `dangerous-write`)
//! funnel into [`flash`], which owns the order of operations: enumerate
//! once, resolve the selector, validate it, obtain a confirmation, then
//! write. Only the injected providers differ between the two modes.

use crate::errors::{ForgeError, ForgeResult};
use crate::list;
use dialoguer::{Confirm, Input};
use log::info;
use mbrforge_hal::{BlockDevice, CatalogOps, DeviceRecord, OpenMode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Only interfaces on the USB bus may be flashed. Internal disks show up
/// under `ata-`, `scsi-`, `nvme-` and the like; no flag overrides this.
pub const USB_DISK_PREFIX: &str = "usb-";

/// Default image name offered by the interactive prompt, matching the
/// usual `merge` output name for stick provisioning.
pub const DEFAULT_IMAGE_NAME: &str = "merged.bin";

/// What to write and where, as produced by a selection provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashRequest {
    pub source: PathBuf,
    pub selector: String,
}

/// Run the write guard end to end.
///
/// The catalog is consulted exactly once; display, resolution, and the
/// write all see the same snapshot.
pub fn flash<S, C>(
    catalog: &dyn CatalogOps,
    dry_run: bool,
    select: S,
    confirm: C,
) -> ForgeResult<()>
where
    S: FnOnce(&[DeviceRecord]) -> ForgeResult<FlashRequest>,
    C: FnOnce(&DeviceRecord) -> ForgeResult<bool>,
{
    let records = catalog.enumerate()?;
    let request = select(&records)?;
    let target = resolve_target(&records, &request.selector)?;
    require_usb_interface(&request.selector)?;

    if !confirm(target)? {
        return Err(ForgeError::UserCancelled);
    }

    if dry_run {
        info!(
            "DRY RUN: would flash {} -> {}",
            request.source.display(),
            target.physical_path.display()
        );
        return Ok(());
    }

    write_image(&request.source, target)
}

/// Exact-match selector lookup. Node paths are deliberately not accepted
/// here: node letters are reassigned across replugs, identifiers are not.
pub fn resolve_target<'a>(
    records: &'a [DeviceRecord],
    selector: &str,
) -> ForgeResult<&'a DeviceRecord> {
    records
        .iter()
        .find(|record| record.class_identifier == selector)
        .ok_or_else(|| ForgeError::UnknownDevice {
            selector: selector.to_string(),
        })
}

pub fn require_usb_interface(selector: &str) -> ForgeResult<()> {
    if selector.starts_with(USB_DISK_PREFIX) {
        Ok(())
    } else {
        Err(ForgeError::UnsafeTarget {
            selector: selector.to_string(),
        })
    }
}

fn write_image(source: &Path, target: &DeviceRecord) -> ForgeResult<()> {
    let image = fs::read(source).map_err(|err| ForgeError::SourceReadFailed {
        path: source.to_path_buf(),
        source: err,
    })?;

    info!(
        "💾 Flashing {} ({} bytes) -> {}",
        source.display(),
        image.len(),
        target.physical_path.display()
    );

    let mut device = BlockDevice::open_exclusive(&target.physical_path, OpenMode::WriteOnly)?;
    let written = device.write_buffer(&image)?;

    info!(
        "✅ Wrote {} bytes to {}",
        written,
        target.physical_path.display()
    );
    Ok(())
}

/// Interactive mode: show the catalog, prompt for a selector and source,
/// and ask one last time before writing.
pub fn run_interactive(catalog: &dyn CatalogOps, dry_run: bool) -> ForgeResult<()> {
    flash(catalog, dry_run, prompt_for_request, prompt_for_confirmation)
}

/// Scripted mode: no prompts. The `--yes-i-know` token stands in for the
/// interactive confirmation.
pub fn run_dangerous(
    catalog: &dyn CatalogOps,
    binary: &Path,
    class_identifier: &str,
    yes_i_know: bool,
    dry_run: bool,
) -> ForgeResult<()> {
    if !yes_i_know {
        return Err(ForgeError::MissingYesIKnow);
    }
    info!("⚠️  --yes-i-know supplied. Skipping confirmation.");

    let request = FlashRequest {
        source: binary.to_path_buf(),
        selector: class_identifier.to_string(),
    };
    flash(catalog, dry_run, |_records| Ok(request), |_target| Ok(true))
}

fn prompt_for_request(records: &[DeviceRecord]) -> ForgeResult<FlashRequest> {
    println!("Attached disks:");
    print!("{}", list::render(records));
    println!();

    let selector: String = Input::new()
        .with_prompt("Class identifier of the disk to ERASE")
        .interact_text()
        .map_err(prompt_failed)?;
    let source: String = Input::new()
        .with_prompt("Image to write")
        .default(DEFAULT_IMAGE_NAME.to_string())
        .interact_text()
        .map_err(prompt_failed)?;

    Ok(FlashRequest {
        source: PathBuf::from(source),
        selector,
    })
}

fn prompt_for_confirmation(target: &DeviceRecord) -> ForgeResult<bool> {
    println!();
    println!(
        "⚠️  You are about to OVERWRITE {}",
        target.physical_path.display()
    );
    println!("⚠️  ({})", target.class_identifier);
    Confirm::new()
        .with_prompt("This is irreversible. Continue?")
        .default(false)
        .interact()
        .map_err(prompt_failed)
}

fn prompt_failed(err: dialoguer::Error) -> ForgeError {
    ForgeError::Io(io::Error::new(io::ErrorKind::Other, err))
}
