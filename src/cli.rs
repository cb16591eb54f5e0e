use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "collision-checkr",
    about = "Score LEO satellite element sets for collision risk",
    version
)]
pub struct Cli {
    /// Element-set file (CSV or OMM XML), or a directory to scan for them
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Model artifact path [default: from config, collision_model.json]
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Fetch a CelesTrak element-set group (e.g. stations, starlink) and
    /// score it instead of scanning PATH (repeatable)
    #[arg(long = "fetch", value_name = "GROUP")]
    pub fetch: Vec<String>,

    /// Config file [default: ./.collision-checkr/config.toml, fallback ~/.config/collision-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Write the augmented table with predictions as CSV; use without value
    /// to default to collision_predictions.csv
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "collision_predictions.csv")]
    pub out: Option<PathBuf>,

    /// Render a risk scatter chart (altitude vs inclination) as PNG; use
    /// without value to default to risk_scatter.png
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "risk_scatter.png")]
    pub chart: Option<PathBuf>,

    /// Show all satellites (not just high-risk ones)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
