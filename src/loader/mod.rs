use std::path::Path;

use anyhow::Result;

use crate::models::Table;

pub mod csv;
pub mod omm;

pub trait Loader {
    fn load(&self, path: &Path) -> Result<Table>;
}

/// Load an input file, dispatching on extension: `.xml` is parsed as CCSDS
/// OMM, everything else as CSV.
pub fn load_table(path: &Path) -> Result<Table> {
    let is_xml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"));

    if is_xml {
        omm::OmmLoader::new().load(path)
    } else {
        csv::CsvLoader::new().load(path)
    }
}
