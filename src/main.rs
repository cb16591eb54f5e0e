//! `collision-checkr` — score LEO satellite element sets for collision risk.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Load the classifier artifact ([`model::RiskModel`]); missing artifact is fatal.
//! 4. Resolve inputs: `--fetch` downloads element-set groups ([`fetch_groups`]),
//!    otherwise the path is scanned ([`detector::find_input_files`]).
//! 5. Per input: parse ([`loader`]), normalize features ([`normalize`]),
//!    predict ([`model`]), then render/export ([`report`]).
//!    Failures are reported per input and do not abort the batch.
//! 6. Exit `0` (clean) or `1` (any high-risk prediction or failed input).

mod cli;
mod config;
mod detector;
mod loader;
mod model;
mod models;
mod normalize;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, ReportFormat};
use config::{load_config, Config};
use model::{clamp01, RiskModel};
use models::{Prediction, Table, Value, LABEL_COLUMN, PROB_COLUMN};
use normalize::Normalized;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;
    let model_path = cli.model.clone().unwrap_or_else(|| config.model.path.clone());

    // Missing or malformed artifact is a fatal startup condition.
    let model = RiskModel::load(&model_path)?;
    if let Some(mismatch) = model.feature_mismatch() {
        eprintln!(
            "  {} feature drift: {}",
            "⚠".yellow(),
            mismatch
        );
    }

    let inputs: Vec<PathBuf> = if cli.fetch.is_empty() {
        detector::find_input_files(&path)
    } else {
        fetch_groups(&cli.fetch, cli.quiet).await?
    };

    if inputs.is_empty() {
        eprintln!("{}", no_inputs_message(!cli.fetch.is_empty(), &path));
        std::process::exit(1);
    }

    let multi = inputs.len() > 1;
    let mut any_high = false;
    let mut any_failed = false;

    for input in &inputs {
        match process_file(input, &model, &config, &cli, multi) {
            Ok(high) => any_high |= high,
            Err(e) => {
                // Surface the failure and keep scoring the remaining inputs.
                eprintln!("  {} {}: {:#}", "✗".red(), input.display(), e);
                any_failed = true;
            }
        }
    }

    if any_high || any_failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Score one input file end to end. Returns whether any satellite in the
/// batch was labelled high risk.
fn process_file(
    input: &Path,
    model: &RiskModel,
    config: &Config,
    cli: &Cli,
    multi: bool,
) -> Result<bool> {
    let raw = loader::load_table(input)?;
    let Normalized { table: mut augmented, features } = normalize::normalize(&raw);

    let predictions = predictions_for(&augmented, &features, model, config.model.threshold);

    if !augmented.has_column(PROB_COLUMN) {
        augmented.insert_column(
            PROB_COLUMN,
            predictions
                .iter()
                .map(|p| Value::Number(p.risk_probability))
                .collect(),
        );
    }
    augmented.insert_column(
        LABEL_COLUMN,
        predictions
            .iter()
            .map(|p| Value::Number(if p.risk_label { 1.0 } else { 0.0 }))
            .collect(),
    );

    match &cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(
                &augmented,
                &predictions,
                input,
                config.display.preview_rows,
                cli.verbose,
                cli.quiet,
            )?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&augmented.to_json_rows())?);
        }
    }

    if let Some(out) = &cli.out {
        report::export::write_csv(&augmented, &output_path_for(out, input, multi))?;
    }
    if let Some(chart) = &cli.chart {
        report::chart::render(&augmented, &predictions, &output_path_for(chart, input, multi))?;
    }

    Ok(predictions.iter().any(|p| p.risk_label))
}

/// Predictions for one batch. An input that already carries a
/// `PredictedRiskProb` column is rendered from those (normalized, imputed)
/// values — demo mode — otherwise the model scores the feature matrix.
/// Labels always come from the threshold, and demo probabilities are clamped
/// to [0, 1] like the model's own output.
fn predictions_for(
    table: &Table,
    features: &[[f64; 3]],
    model: &RiskModel,
    threshold: f64,
) -> Vec<Prediction> {
    match table.column(PROB_COLUMN) {
        Some(column) => column
            .iter()
            .map(|cell| {
                let p = clamp01(cell.as_f64().unwrap_or(0.0));
                Prediction {
                    risk_probability: p,
                    risk_label: p >= threshold,
                }
            })
            .collect(),
        None => model.predict(features, threshold),
    }
}

fn no_inputs_message(fetch_mode: bool, path: &Path) -> String {
    if fetch_mode {
        "No element-set groups could be fetched from CelesTrak".to_string()
    } else {
        format!(
            "No element-set files (CSV/OMM XML) found in {}",
            path.display()
        )
    }
}

/// With several inputs, prefix shared output names by the input stem so each
/// batch gets its own file.
fn output_path_for(base: &Path, input: &Path, multi: bool) -> PathBuf {
    if !multi {
        return base.to_path_buf();
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input");
    let name = base
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    base.with_file_name(format!("{}_{}", stem, name))
}

/// Download CelesTrak GP element sets for the requested groups, concurrently,
/// writing `<group>.csv` next to the working directory.
async fn fetch_groups(groups: &[String], quiet: bool) -> Result<Vec<PathBuf>> {
    use futures::future::join_all;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let pb = if !quiet {
        let pb = ProgressBar::new(groups.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let futures: Vec<_> = groups
        .iter()
        .map(|group| {
            let client = client.clone();
            let group = group.clone();
            async move {
                let url = format!(
                    "https://celestrak.org/NORAD/elements/gp.php?GROUP={}&FORMAT=csv",
                    group
                );
                let body = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Ok::<(String, String), anyhow::Error>((group, body))
            }
        })
        .collect();

    let results = join_all(futures).await;

    let mut files = Vec::new();
    for (group, result) in groups.iter().zip(results) {
        match result {
            Ok((group, body)) => {
                let file = PathBuf::from(format!("{}.csv", group));
                std::fs::write(&file, body)?;
                files.push(file);
            }
            Err(e) => {
                eprintln!("  {} fetch {} failed: {}", "⚠".yellow(), group, e);
            }
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(files)
}
