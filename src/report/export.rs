use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Table;

/// Write the augmented table (original columns, computed features, and
/// prediction columns) as CSV. Missing cells become empty fields.
pub fn write_csv(table: &Table, output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    writer.write_record(table.columns())?;

    for row in 0..table.len() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|name| {
                table
                    .column(name)
                    .map(|col| col[row].to_string())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    println!("Predictions written to: {}", output_path.display());
    Ok(())
}
