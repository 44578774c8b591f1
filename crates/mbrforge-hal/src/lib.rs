//! mbrforge hardware access layer.
//!
//! Everything that touches the block layer lives here: the device catalog
//! (persistent-identifier enumeration with canonical-node resolution) and
//! the raw sector I/O engine. The application crate never opens a device
//! node on its own.

pub mod blockio;
pub mod catalog;
pub mod error;
pub mod sysfs;

pub use blockio::{BlockDevice, OpenMode, SECTOR_SIZE};
pub use catalog::{CatalogOps, DeviceRecord, FakeCatalog, LinuxCatalog};
pub use error::{HalError, HalResult};
