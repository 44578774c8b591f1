use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = std::result::Result<T, HalError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("Device enumeration failed: {source}")]
    EnumerationFailed {
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open {}: {source}", .path.display())]
    DeviceOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Topology query failed for {}: {detail}", .path.display())]
    TopologyQueryFailed { path: PathBuf, detail: String },

    #[error("Read failed on {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Short read on {}: expected {expected} bytes, got {actual}", .path.display())]
    ShortRead {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Write failed on {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Short write on {}: wrote {actual} of {expected} bytes", .path.display())]
    ShortWrite {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}
