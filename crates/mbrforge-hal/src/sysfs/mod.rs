//! sysfs lookups backing the device catalog.

pub mod devnode;
