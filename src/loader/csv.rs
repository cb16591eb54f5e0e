use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Table, Value};

/// Loader for CSV element sets.
///
/// Cells are typed on read: empty → missing, finite float → number,
/// everything else → text. Uppercase CelesTrak GP headers are aliased to the
/// lowercase source-column names the normalizer recognizes, when those names
/// are not already taken.
pub struct CsvLoader;

/// GP/OMM header → recognized source column.
const GP_HEADER_ALIASES: [(&str, &str); 3] = [
    ("MEAN_MOTION", "mean_motion"),
    ("INCLINATION", "inclination"),
    ("ECCENTRICITY", "eccentricity"),
];

impl CsvLoader {
    /// Create a new `CsvLoader`.
    pub fn new() -> Self {
        Self
    }
}

impl super::Loader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Table> {
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Malformed CSV record in {}", path.display()))?;
            for (i, column) in columns.iter_mut().enumerate() {
                // flexible(true): short records pad out as missing.
                column.push(Value::parse(record.get(i).unwrap_or("")));
            }
        }

        let mut table = Table::new();
        for (name, values) in headers.iter().zip(columns) {
            table.insert_column(name, values);
        }
        alias_gp_headers(&mut table);
        Ok(table)
    }
}

fn alias_gp_headers(table: &mut Table) {
    for (gp, alias) in GP_HEADER_ALIASES {
        if !table.has_column(alias) {
            table.rename_column(gp, alias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_types_cells() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "satellite_id,mean_motion,Inclination").unwrap();
        writeln!(f, "sat-1,15.5,51.6").unwrap();
        writeln!(f, "sat-2,,97.8").unwrap();
        writeln!(f, "sat-3,bad,28.5").unwrap();

        let table = CsvLoader::new().load(f.path()).unwrap();
        assert_eq!(table.len(), 3);
        let mm = table.column("mean_motion").unwrap();
        assert_eq!(mm[0], Value::Number(15.5));
        assert_eq!(mm[1], Value::Missing);
        assert_eq!(mm[2], Value::Text("bad".to_string()));
        assert_eq!(
            table.column("satellite_id").unwrap()[0],
            Value::Text("sat-1".to_string())
        );
    }

    #[test]
    fn test_gp_headers_are_aliased() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "OBJECT_NAME,MEAN_MOTION,ECCENTRICITY,INCLINATION").unwrap();
        writeln!(f, "ISS (ZARYA),15.49,0.0004,51.64").unwrap();

        let table = CsvLoader::new().load(f.path()).unwrap();
        assert!(table.has_column("mean_motion"));
        assert!(table.has_column("eccentricity"));
        assert!(table.has_column("inclination"));
        assert!(!table.has_column("MEAN_MOTION"));
        // Untracked GP columns keep their original names.
        assert!(table.has_column("OBJECT_NAME"));
    }

    #[test]
    fn test_alias_skipped_when_lowercase_present() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "mean_motion,MEAN_MOTION").unwrap();
        writeln!(f, "15.0,14.0").unwrap();

        let table = CsvLoader::new().load(f.path()).unwrap();
        assert_eq!(table.column("mean_motion").unwrap()[0], Value::Number(15.0));
        assert_eq!(table.column("MEAN_MOTION").unwrap()[0], Value::Number(14.0));
    }

    #[test]
    fn test_short_records_pad_missing() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "a,b,c").unwrap();
        writeln!(f, "1,2").unwrap();

        let table = CsvLoader::new().load(f.path()).unwrap();
        assert_eq!(table.column("c").unwrap()[0], Value::Missing);
    }
}
