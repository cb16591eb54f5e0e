//! The collision-risk classifier: a pre-trained binary logistic regression
//! consumed as an opaque artifact.
//!
//! Artifact schema (JSON):
//!
//! ```json
//! {
//!   "features": ["Altitude_km", "Inclination", "Eccentricity"],
//!   "coefficients": [0.0042, -0.31, 12.5],
//!   "intercept": -1.8
//! }
//! ```
//!
//! `features` records the training-time column names so a drift between
//! training and inference features can be surfaced instead of silently
//! scored through.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{Prediction, FEATURE_COLUMNS};

/// A serialized logistic-regression model.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskModel {
    /// Feature column names the model was trained on, in coefficient order.
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl RiskModel {
    /// Load and validate the artifact. A missing or malformed artifact is a
    /// fatal startup condition.
    pub fn load(path: &Path) -> Result<RiskModel> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Model artifact not found: {} (train a model or point --model at one)",
                path.display()
            )
        })?;
        let model: RiskModel = serde_json::from_str(&content)
            .with_context(|| format!("Malformed model artifact: {}", path.display()))?;

        if model.coefficients.len() != FEATURE_COLUMNS.len() {
            bail!(
                "Model artifact has {} coefficients, expected {}",
                model.coefficients.len(),
                FEATURE_COLUMNS.len()
            );
        }
        Ok(model)
    }

    /// If the training-time feature names differ from the inference columns,
    /// return a human-readable description of the mismatch.
    pub fn feature_mismatch(&self) -> Option<String> {
        if self.features == FEATURE_COLUMNS {
            return None;
        }
        Some(format!(
            "model was trained on [{}] but is scored with [{}]",
            self.features.join(", "),
            FEATURE_COLUMNS.join(", ")
        ))
    }

    /// Positive-class probability for each feature row.
    pub fn predict_proba(&self, features: &[[f64; 3]]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                let z: f64 = self
                    .coefficients
                    .iter()
                    .zip(row.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + self.intercept;
                clamp01(sigmoid(z))
            })
            .collect()
    }

    /// Probabilities plus thresholded labels (`p >= threshold` → high risk).
    pub fn predict(&self, features: &[[f64; 3]], threshold: f64) -> Vec<Prediction> {
        self.predict_proba(features)
            .into_iter()
            .map(|p| Prediction {
                risk_probability: p,
                risk_label: p >= threshold,
            })
            .collect()
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub(crate) fn clamp01(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn unit_model() -> RiskModel {
        RiskModel {
            features: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![1.0, 0.0, 0.0],
            intercept: 0.0,
        }
    }

    #[test]
    fn test_sigmoid_midpoint_and_tails() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_predict_proba_is_monotonic_in_features() {
        let model = unit_model();
        let probs = model.predict_proba(&[[-1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(probs[0] < probs[1]);
        assert!(probs[1] < probs[2]);
        assert_eq!(probs[1], 0.5);
    }

    #[test]
    fn test_threshold_boundary_is_high_risk() {
        let model = unit_model();
        // z = 0 → p = 0.5, and p >= threshold counts as high risk.
        let preds = model.predict(&[[0.0, 0.0, 0.0]], 0.5);
        assert!(preds[0].risk_label);
        assert_eq!(preds[0].risk_probability, 0.5);
    }

    #[test]
    fn test_load_roundtrip() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"features":["Altitude_km","Inclination_rad","Eccentricity"],
                "coefficients":[0.001,-0.5,2.0],"intercept":-0.25}}"#
        )
        .unwrap();

        let model = RiskModel::load(f.path()).unwrap();
        assert_eq!(model.coefficients, vec![0.001, -0.5, 2.0]);
        assert_eq!(model.intercept, -0.25);
        assert!(model.feature_mismatch().is_none());
    }

    #[test]
    fn test_load_missing_artifact_is_fatal() {
        let err = RiskModel::load(Path::new("/nonexistent/collision_model.json")).unwrap_err();
        assert!(err.to_string().contains("Model artifact not found"));
    }

    #[test]
    fn test_load_rejects_wrong_coefficient_count() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"features":["a"],"coefficients":[1.0],"intercept":0.0}}"#
        )
        .unwrap();
        assert!(RiskModel::load(f.path()).is_err());
    }

    #[test]
    fn test_shipped_sample_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("collision_model.json");
        let model = RiskModel::load(&path).unwrap();
        assert_eq!(model.coefficients.len(), FEATURE_COLUMNS.len());
        assert!(model.feature_mismatch().is_none());
    }

    #[test]
    fn test_feature_mismatch_flags_training_drift() {
        let model = RiskModel {
            // Degree-valued training column — the drift worth surfacing.
            features: vec![
                "Altitude_km".to_string(),
                "Inclination".to_string(),
                "Eccentricity".to_string(),
            ],
            coefficients: vec![0.0, 0.0, 0.0],
            intercept: 0.0,
        };
        let warning = model.feature_mismatch().unwrap();
        assert!(warning.contains("Inclination"));
        assert!(warning.contains("Inclination_rad"));
    }
}
