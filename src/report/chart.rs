use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

use crate::models::{Prediction, Table};

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;

/// Render the risk scatter as PNG: altitude (km) against inclination (rad),
/// each point colored by its predicted risk probability (blue → red).
pub fn render(table: &Table, predictions: &[Prediction], output_path: &Path) -> Result<()> {
    let points: Vec<(f64, f64, f64)> = predictions
        .iter()
        .enumerate()
        .map(|(row, pred)| {
            (
                numeric_at(table, "Altitude_km", row),
                numeric_at(table, "Inclination_rad", row),
                pred.risk_probability,
            )
        })
        .collect();

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("chart: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted collision risk", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(56)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("chart: {}", e))?;

    chart
        .configure_mesh()
        .x_desc("Altitude (km)")
        .y_desc("Inclination (rad)")
        .draw()
        .map_err(|e| anyhow!("chart: {}", e))?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y, p)| Circle::new((x, y), 5, risk_color(p).filled())),
        )
        .map_err(|e| anyhow!("chart: {}", e))?;

    root.present().map_err(|e| anyhow!("chart: {}", e))?;
    println!("Risk chart written to: {}", output_path.display());
    Ok(())
}

fn numeric_at(table: &Table, name: &str, row: usize) -> f64 {
    table
        .column(name)
        .and_then(|col| col[row].as_f64())
        .unwrap_or(0.0)
}

/// Axis range with a 5% margin; degenerate ranges get a fixed pad so the
/// chart stays drawable for single-point or constant batches.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Interpolate low-risk blue to high-risk red.
fn risk_color(probability: f64) -> RGBColor {
    let p = probability.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * p).round() as u8;
    RGBColor(lerp(40, 220), lerp(80, 60), lerp(200, 45))
}
