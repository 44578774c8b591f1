//! Raw sector I/O against block devices.
//!
//! The engine issues exactly one transfer syscall per operation and
//! reports the outcome as-is: a short transfer is an error carrying both
//! byte counts, never a retry. An interrupted transfer leaves the device
//! in an undefined state and must be re-run from scratch by the caller.

use crate::error::{HalError, HalResult};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// One logical sector. Reads at this layer are sector-granular; writes
/// take whole buffers (a sector or a full image) unchanged.
pub const SECTOR_SIZE: usize = 512;

/// Access direction for a device claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    WriteOnly,
}

/// An exclusively claimed device handle.
///
/// The claim is the kernel's: `O_EXCL` on a block device fails with
/// `EBUSY` while anyone else (including a mount) holds it. On regular
/// files the flag has no effect, which keeps the engine testable against
/// scratch files. The handle is released on drop, on every exit path.
#[derive(Debug)]
pub struct BlockDevice {
    file: File,
    path: PathBuf,
}

impl BlockDevice {
    pub fn open_exclusive(path: &Path, mode: OpenMode) -> HalResult<Self> {
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::ReadOnly => options.read(true),
            // The node must already exist; never create or truncate it.
            OpenMode::WriteOnly => options.write(true).create(false).truncate(false),
        };
        let file = options
            .custom_flags(nix::fcntl::OFlag::O_EXCL.bits())
            .open(path)
            .map_err(|source| HalError::DeviceOpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read exactly one sector from the current position.
    pub fn read_sector(&mut self) -> HalResult<[u8; SECTOR_SIZE]> {
        read_sector_from(&mut self.file, &self.path)
    }

    /// Write `buf` in a single transfer and flush it to media.
    ///
    /// Returns the byte count the kernel reported, which on success is
    /// always `buf.len()`.
    pub fn write_buffer(&mut self, buf: &[u8]) -> HalResult<usize> {
        let written = write_buffer_to(&mut self.file, &self.path, buf)?;
        self.file
            .sync_all()
            .map_err(|source| HalError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;
        Ok(written)
    }
}

fn read_sector_from<R: Read>(reader: &mut R, path: &Path) -> HalResult<[u8; SECTOR_SIZE]> {
    let mut sector = [0u8; SECTOR_SIZE];
    let got = reader
        .read(&mut sector)
        .map_err(|source| HalError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    if got != SECTOR_SIZE {
        return Err(HalError::ShortRead {
            path: path.to_path_buf(),
            expected: SECTOR_SIZE,
            actual: got,
        });
    }
    Ok(sector)
}

fn write_buffer_to<W: Write>(writer: &mut W, path: &Path, buf: &[u8]) -> HalResult<usize> {
    let written = writer.write(buf).map_err(|source| HalError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    if written != buf.len() {
        return Err(HalError::ShortWrite {
            path: path.to_path_buf(),
            expected: buf.len(),
            actual: written,
        });
    }
    Ok(written)
}
