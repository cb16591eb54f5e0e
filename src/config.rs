use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.collision-checkr/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Classifier artifact settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Terminal report settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized model artifact.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// Decision threshold on the positive-class probability.
    /// The shipped model is calibrated for 0.5.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// Maximum rows shown per terminal table.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("collision_model.json")
}

fn default_threshold() -> f64 {
    0.5
}

fn default_preview_rows() -> usize {
    20
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: default_model_path(),
            threshold: default_threshold(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            preview_rows: default_preview_rows(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: ModelConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<input_path>/.collision-checkr/config.toml`
/// 3. `~/.config/collision-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(input_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let base = if input_path.is_dir() {
        input_path.to_path_buf()
    } else {
        input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };

    let local_config = base.join(".collision-checkr").join("config.toml");
    if local_config.exists() {
        let content = std::fs::read_to_string(&local_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("collision-checkr")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}
