use mbrforge_hal::HalError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ForgeResult<T> = Result<T, ForgeError>;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("The {input} must be exactly {expected} bytes, got {actual}")]
    InvalidLength {
        input: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No attached disk has class identifier '{selector}'")]
    UnknownDevice { selector: String },

    #[error("'{selector}' is not a USB disk interface. Refusing to overwrite it.")]
    UnsafeTarget { selector: String },

    #[error("Cancelled. Nothing was written.")]
    UserCancelled,

    #[error("Could not read source image {}: {source}", .path.display())]
    SourceReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write {}: {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing --yes-i-know flag. This operation is destructive!")]
    MissingYesIKnow,
}
