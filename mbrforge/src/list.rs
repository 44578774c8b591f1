//! Catalog listing.

use crate::errors::ForgeResult;
use mbrforge_hal::{CatalogOps, DeviceRecord};
use std::fmt::Write as _;

/// One `physical path <TAB> class identifier` line per record, in catalog
/// order. The identifier column is what `write` and `dangerous-write`
/// take as their selector.
pub fn render(records: &[DeviceRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{}\t{}",
            record.physical_path.display(),
            record.class_identifier
        );
    }
    out
}

pub fn run(catalog: &dyn CatalogOps) -> ForgeResult<()> {
    let records = catalog.enumerate()?;
    print!("{}", render(&records));
    Ok(())
}
