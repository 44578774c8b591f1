//! Recording catalog for tests.
//!
//! Serves a configured set of records without touching the system, so
//! guard logic can run in CI without hardware or root privileges.

use super::{canonicalize, CatalogOps, DeviceRecord};
use crate::error::{HalError, HalResult};
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct FakeCatalogState {
    records: Vec<DeviceRecord>,
    fail_enumeration: bool,
    enumerate_calls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<FakeCatalogState>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DeviceRecord>) -> Self {
        let catalog = Self::new();
        catalog.state.lock().unwrap().records = records;
        catalog
    }

    /// Make every subsequent `enumerate` call fail.
    pub fn failing() -> Self {
        let catalog = Self::new();
        catalog.state.lock().unwrap().fail_enumeration = true;
        catalog
    }

    /// How many times `enumerate` has been called.
    pub fn enumerate_calls(&self) -> usize {
        self.state.lock().unwrap().enumerate_calls
    }
}

impl CatalogOps for FakeCatalog {
    fn enumerate(&self) -> HalResult<Vec<DeviceRecord>> {
        let mut state = self.state.lock().unwrap();
        state.enumerate_calls += 1;
        if state.fail_enumeration {
            return Err(HalError::EnumerationFailed {
                source: io::Error::new(io::ErrorKind::Other, "injected enumeration failure"),
            });
        }
        let mut records = state.records.clone();
        canonicalize(&mut records);
        Ok(records)
    }
}
