use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table as UiTable};

use crate::models::{Prediction, Table, FEATURE_COLUMNS, ID_COLUMNS};

/// Render a colored terminal report for one scored batch.
pub fn render(
    table: &Table,
    predictions: &[Prediction],
    source: &Path,
    preview_rows: usize,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let total = predictions.len();
    let high_count = predictions.iter().filter(|p| p.risk_label).count();
    let low_count = total - high_count;

    if quiet {
        println!(
            "{}: Total: {}  High: {}  Low: {}",
            source.display(),
            total,
            high_count.to_string().red(),
            low_count.to_string().green(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "collision-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scoring: {}\n", source.display());

    let mean_prob = if total > 0 {
        predictions.iter().map(|p| p.risk_probability).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let riskiest = predictions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.risk_probability.total_cmp(&b.risk_probability));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Satellites scored  : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  High risk       : {:>4}", "✗".red(), high_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Low risk        : {:>4}", "✓".green(), low_count)
    );
    println!(
        " │  {:<48} │",
        format!("Mean risk prob     : {:.3}", mean_prob)
    );
    if let Some((row, pred)) = riskiest {
        println!(
            " │  {:<48} │",
            format!(
                "Highest            : {:.3}  ({})",
                pred.risk_probability,
                row_id(table, row)
            )
        );
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    if high_count > 0 {
        println!(" {} High-risk satellites:\n", "[HIGH]".red().bold());
        render_table(table, predictions, true, preview_rows);
        println!();
    } else {
        println!(" {} No high-risk satellites in this batch.\n", "✓".green());
    }

    if verbose && low_count > 0 {
        println!(" {} Low-risk satellites:\n", "[LOW]".green().bold());
        render_table(table, predictions, false, preview_rows);
        println!();
    }

    Ok(())
}

fn render_table(table: &Table, predictions: &[Prediction], high: bool, preview_rows: usize) {
    let mut ui = UiTable::new();
    ui.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Satellite").add_attribute(Attribute::Bold),
            Cell::new("Altitude (km)").add_attribute(Attribute::Bold),
            Cell::new("Inclination (rad)").add_attribute(Attribute::Bold),
            Cell::new("Eccentricity").add_attribute(Attribute::Bold),
            Cell::new("Risk prob").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    let rows: Vec<usize> = predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.risk_label == high)
        .map(|(i, _)| i)
        .collect();

    for &row in rows.iter().take(preview_rows) {
        let pred = &predictions[row];
        let (badge, badge_color) = if pred.risk_label {
            ("✗ High", Color::Red)
        } else {
            ("✓ Low", Color::Green)
        };

        let mut cells = vec![Cell::new(row_id(table, row))];
        for name in FEATURE_COLUMNS {
            cells.push(Cell::new(feature_cell(table, name, row)).set_alignment(CellAlignment::Right));
        }
        cells.push(
            Cell::new(format!("{:.3}", pred.risk_probability))
                .set_alignment(CellAlignment::Right),
        );
        cells.push(
            Cell::new(badge)
                .fg(badge_color)
                .set_alignment(CellAlignment::Center),
        );
        ui.add_row(cells);
    }

    println!("{}", ui);

    if rows.len() > preview_rows {
        println!("   … and {} more", rows.len() - preview_rows);
    }
}

/// Best display identifier for a row: first recognized id column with a
/// value, falling back to the row index.
fn row_id(table: &Table, row: usize) -> String {
    for name in ID_COLUMNS {
        if let Some(column) = table.column(name) {
            let cell = &column[row];
            if !cell.is_missing() {
                return cell.to_string();
            }
        }
    }
    format!("#{}", row)
}

fn feature_cell(table: &Table, name: &str, row: usize) -> String {
    table
        .column(name)
        .and_then(|col| col[row].as_f64())
        .map(|n| format!("{:.4}", n))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    #[test]
    fn test_row_id_prefers_satellite_id() {
        let mut table = Table::new();
        table.insert_column("NORAD_CAT_ID", vec![Value::Number(25544.0)]);
        table.insert_column("satellite_id", vec![Value::Text("iss".into())]);
        assert_eq!(row_id(&table, 0), "iss");
    }

    #[test]
    fn test_row_id_falls_back_to_index() {
        let mut table = Table::new();
        table.insert_column("Altitude_km", vec![Value::Number(500.0)]);
        assert_eq!(row_id(&table, 0), "#0");
    }

    #[test]
    fn test_row_id_skips_missing_cells() {
        let mut table = Table::new();
        table.insert_column("satellite_id", vec![Value::Missing]);
        table.insert_column("OBJECT_NAME", vec![Value::Text("ISS".into())]);
        assert_eq!(row_id(&table, 0), "ISS");
    }
}
