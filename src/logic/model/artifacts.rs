//! Model Artifacts - everything persisted by the training side
//!
//! Every artifact is optional. A missing file is normal (demo mode) and is
//! logged at info; a malformed file is logged at warn and recorded in
//! `warnings` so the UI can surface it. Loading itself never fails.
//!
//! `explanation_cache.json` maps a key to `{features, values[, score]}`. The
//! key is the normalized profile rendered as `[Name=value;...]`: technical
//! field names sorted ascending, numeric codes for categorical fields,
//! integral values without a fractional part, e.g.
//! `[Age=30;JobSatisfaction=1;OverTime=1]`. Absent fields are left out.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{Classifier, LogisticClassifier, OnnxClassifier};
use super::scaler::StandardScaler;
use crate::constants;
use crate::logic::error::ArtifactError;
use crate::logic::explain::{CachedExplanation, ExplainerConfig};
use crate::logic::features::ModelLayout;

// ============================================================================
// METADATA
// ============================================================================

/// Model metadata (`model_metadata.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub model_type: String,
    pub test_accuracy: f64,
    pub roc_auc: f64,
    /// Hex SHA-256 of the model file, verified at load when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
}

impl Default for ModelMetadata {
    /// Demo values shown when no metadata artifact exists
    fn default() -> Self {
        Self {
            model_type: "Demo".to_string(),
            test_accuracy: 0.87,
            roc_auc: 0.82,
            model_sha256: None,
        }
    }
}

// ============================================================================
// ARTIFACTS
// ============================================================================

pub struct ModelArtifacts {
    pub dir: PathBuf,
    pub layout: ModelLayout,
    pub classifier: Option<Arc<dyn Classifier>>,
    pub scaler: Option<StandardScaler>,
    pub metadata: ModelMetadata,
    pub explainer_config: ExplainerConfig,
    /// Raw importance artifact, validated by `logic::importance`
    pub importance: Option<serde_json::Value>,
    pub descriptions: BTreeMap<String, String>,
    pub explanation_cache: Vec<(String, CachedExplanation)>,
    pub background_rows: Option<Vec<Vec<f64>>>,
    pub warnings: Vec<String>,
}

impl ModelArtifacts {
    /// No artifacts at all (demo mode)
    pub fn empty() -> Self {
        Self {
            dir: PathBuf::new(),
            layout: ModelLayout::default_layout(),
            classifier: None,
            scaler: None,
            metadata: ModelMetadata::default(),
            explainer_config: ExplainerConfig::default(),
            importance: None,
            descriptions: BTreeMap::new(),
            explanation_cache: Vec::new(),
            background_rows: None,
            warnings: Vec::new(),
        }
    }

    /// Load whatever is present in `dir`
    pub fn load(dir: &Path) -> Self {
        log::info!("Loading model artifacts from: {}", dir.display());

        let mut artifacts = Self::empty();
        artifacts.dir = dir.to_path_buf();

        if let Some(names) = artifacts.optional::<Vec<String>>(constants::FEATURE_NAMES_FILE) {
            if names.is_empty() {
                artifacts.record(ArtifactError::malformed(
                    dir.join(constants::FEATURE_NAMES_FILE),
                    "empty feature list",
                ));
            } else {
                artifacts.layout = ModelLayout::new(names);
            }
        }

        if let Some(metadata) = artifacts.optional::<ModelMetadata>(constants::METADATA_FILE) {
            artifacts.metadata = metadata;
        }

        if let Some(scaler) = artifacts.optional::<StandardScaler>(constants::SCALER_FILE) {
            if scaler.is_consistent() {
                artifacts.scaler = Some(scaler);
            } else {
                let reason = format!("mean has {} entries, scale has {}", scaler.mean.len(), scaler.scale.len());
                artifacts.record(ArtifactError::malformed(dir.join(constants::SCALER_FILE), reason));
            }
        }

        artifacts.classifier = artifacts.load_classifier();

        if let Some(config) = artifacts.optional::<ExplainerConfig>(constants::EXPLAINER_CONFIG_FILE) {
            artifacts.explainer_config = config;
        }
        artifacts.importance = artifacts.optional::<serde_json::Value>(constants::IMPORTANCE_FILE);
        if let Some(descriptions) = artifacts.optional::<BTreeMap<String, String>>(constants::DESCRIPTIONS_FILE) {
            artifacts.descriptions = descriptions;
        }
        if let Some(cache) =
            artifacts.optional::<BTreeMap<String, CachedExplanation>>(constants::EXPLANATION_CACHE_FILE)
        {
            artifacts.explanation_cache = cache.into_iter().collect();
        }
        artifacts.background_rows = artifacts.optional::<Vec<Vec<f64>>>(constants::BACKGROUND_FILE);

        artifacts.check_dimensions();

        log::info!(
            "Artifacts loaded: classifier={}, scaler={}, columns={}, warnings={}",
            artifacts.classifier.as_ref().map(|c| c.name()).unwrap_or("none"),
            artifacts.scaler.is_some(),
            artifacts.layout.len(),
            artifacts.warnings.len()
        );

        artifacts
    }

    /// A classifier is available. The scaler is optional; without it the
    /// model sees unscaled input.
    pub fn is_live_ready(&self) -> bool {
        self.classifier.is_some()
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn record(&mut self, error: ArtifactError) {
        if error.is_missing() {
            log::info!("{}", error);
        } else {
            log::warn!("{}", error);
            self.warnings.push(error.to_string());
        }
    }

    fn optional<T: DeserializeOwned>(&mut self, file: &str) -> Option<T> {
        let path = self.path(file);
        match read_json(&path) {
            Ok(value) => {
                log::debug!("Loaded {}", path.display());
                Some(value)
            }
            Err(e) => {
                self.record(e);
                None
            }
        }
    }

    fn load_classifier(&mut self) -> Option<Arc<dyn Classifier>> {
        let onnx_path = self.path(constants::ONNX_MODEL_FILE);
        if onnx_path.exists() {
            match self.verify_checksum(&onnx_path) {
                Ok(()) => match OnnxClassifier::load(&onnx_path, Some(self.layout.len())) {
                    Ok(classifier) => return Some(Arc::new(classifier)),
                    Err(e) => self.record(ArtifactError::malformed(&onnx_path, e)),
                },
                Err(e) => {
                    self.record(e);
                    return None;
                }
            }
        }

        let logistic_path = self.path(constants::LOGISTIC_MODEL_FILE);
        if logistic_path.exists() {
            if let Err(e) = self.verify_checksum(&logistic_path) {
                self.record(e);
                return None;
            }
        }
        self.optional::<LogisticClassifier>(constants::LOGISTIC_MODEL_FILE)
            .map(|classifier| Arc::new(classifier) as Arc<dyn Classifier>)
    }

    fn verify_checksum(&self, model_path: &Path) -> Result<(), ArtifactError> {
        let Some(expected) = self.metadata.model_sha256.as_deref() else {
            return Ok(());
        };
        let actual = compute_file_hash(model_path).map_err(|e| ArtifactError::malformed(model_path, e))?;
        if actual.eq_ignore_ascii_case(expected.trim()) {
            Ok(())
        } else {
            Err(ArtifactError::malformed(
                model_path,
                format!("checksum mismatch (expected {}, got {})", expected, actual),
            ))
        }
    }

    /// Mismatched sizes are reported, not rejected: requests fail individually
    fn check_dimensions(&mut self) {
        let columns = self.layout.len();
        if let Some(scaler) = &self.scaler {
            if scaler.dim() != columns {
                let message = format!("scaler has {} columns, model layout has {}", scaler.dim(), columns);
                log::warn!("{}", message);
                self.warnings.push(message);
            }
        }
        if let Some(dim) = self.classifier.as_ref().and_then(|c| c.input_dim()) {
            if dim != columns {
                let message = format!("classifier expects {} columns, model layout has {}", dim, columns);
                log::warn!("{}", message);
                self.warnings.push(message);
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing { path: path.to_path_buf() });
    }
    let content = fs::read_to_string(path).map_err(|e| ArtifactError::malformed(path, e))?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::malformed(path, e))
}

/// Compute SHA256 hash of file
fn compute_file_hash(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    fn logistic_json(dim: usize) -> String {
        serde_json::json!({ "coefficients": vec![0.1; dim], "intercept": 0.0 }).to_string()
    }

    fn scaler_json(dim: usize) -> String {
        serde_json::json!({ "mean": vec![0.0; dim], "scale": vec![1.0; dim] }).to_string()
    }

    #[test]
    fn test_empty_dir_is_demo_mode() {
        let dir = tempdir().unwrap();
        let artifacts = ModelArtifacts::load(dir.path());

        assert!(!artifacts.is_live_ready());
        assert_eq!(artifacts.layout, ModelLayout::default_layout());
        assert_eq!(artifacts.metadata, ModelMetadata::default());
        assert_eq!(artifacts.metadata.model_type, "Demo");
        assert!(artifacts.warnings.is_empty());
        assert!(artifacts.importance.is_none());
    }

    #[test]
    fn test_logistic_artifacts_load() {
        let dir = tempdir().unwrap();
        write(dir.path(), constants::FEATURE_NAMES_FILE, r#"["Age", "OverTime_Yes", "JobSatisfaction"]"#);
        write(dir.path(), constants::LOGISTIC_MODEL_FILE, &logistic_json(3));
        write(dir.path(), constants::SCALER_FILE, &scaler_json(3));
        write(
            dir.path(),
            constants::METADATA_FILE,
            r#"{"model_type": "LogisticRegression", "test_accuracy": 0.9, "roc_auc": 0.85}"#,
        );

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.is_live_ready());
        assert_eq!(artifacts.layout.len(), 3);
        assert_eq!(artifacts.layout.index_of("OverTime_Yes"), Some(1));
        assert_eq!(artifacts.metadata.model_type, "LogisticRegression");
        assert!(artifacts.warnings.is_empty());
    }

    #[test]
    fn test_malformed_artifacts_are_reported() {
        let dir = tempdir().unwrap();
        write(dir.path(), constants::SCALER_FILE, "{not json");
        write(dir.path(), constants::FEATURE_NAMES_FILE, "[]");

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.scaler.is_none());
        assert_eq!(artifacts.layout, ModelLayout::default_layout());
        assert_eq!(artifacts.warnings.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch_is_a_warning() {
        let dir = tempdir().unwrap();
        write(dir.path(), constants::LOGISTIC_MODEL_FILE, &logistic_json(19));
        write(dir.path(), constants::SCALER_FILE, &scaler_json(5));

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.is_live_ready());
        assert_eq!(artifacts.warnings.len(), 1);
        assert!(artifacts.warnings[0].contains("scaler"));
    }

    #[test]
    fn test_model_without_scaler_is_live_ready() {
        let dir = tempdir().unwrap();
        write(dir.path(), constants::LOGISTIC_MODEL_FILE, &logistic_json(19));

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.scaler.is_none());
        assert!(artifacts.is_live_ready());
        assert!(artifacts.warnings.is_empty());
    }

    #[test]
    fn test_checksum_mismatch_rejects_model() {
        let dir = tempdir().unwrap();
        write(dir.path(), constants::LOGISTIC_MODEL_FILE, &logistic_json(19));
        write(dir.path(), constants::SCALER_FILE, &scaler_json(19));
        write(dir.path(), constants::METADATA_FILE, r#"{"model_sha256": "deadbeef"}"#);

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.classifier.is_none());
        assert!(!artifacts.is_live_ready());
        assert!(artifacts.warnings.iter().any(|w| w.contains("checksum")));
        // partial metadata keeps demo defaults for the rest
        assert_eq!(artifacts.metadata.test_accuracy, 0.87);
    }

    #[test]
    fn test_checksum_match_accepts_model() {
        let dir = tempdir().unwrap();
        let model = logistic_json(19);
        write(dir.path(), constants::LOGISTIC_MODEL_FILE, &model);
        let digest = hex::encode(Sha256::digest(model.as_bytes()));
        write(
            dir.path(),
            constants::METADATA_FILE,
            &serde_json::json!({ "model_sha256": digest.to_uppercase() }).to_string(),
        );

        let artifacts = ModelArtifacts::load(dir.path());
        assert!(artifacts.classifier.is_some());
    }

    #[test]
    fn test_explanation_cache_and_descriptions() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            constants::EXPLANATION_CACHE_FILE,
            r#"{"[Age=30]": {"features": ["Age <= 30.00"], "values": [0.1]}}"#,
        );
        write(dir.path(), constants::DESCRIPTIONS_FILE, r#"{"Age": "Usia karyawan"}"#);
        write(dir.path(), constants::EXPLAINER_CONFIG_FILE, r#"{"num_features": 5}"#);

        let artifacts = ModelArtifacts::load(dir.path());
        assert_eq!(artifacts.explanation_cache.len(), 1);
        assert_eq!(artifacts.explanation_cache[0].0, "[Age=30]");
        assert_eq!(artifacts.descriptions.get("Age").map(String::as_str), Some("Usia karyawan"));
        assert_eq!(artifacts.explainer_config.num_features, 5);
        assert_eq!(artifacts.explainer_config.num_samples, 1000);
    }
}
