//! Classifiers - black-box "rows in, class probabilities out"
//!
//! Two backends:
//! - `OnnxClassifier`: exported model run through ONNX Runtime
//! - `LogisticClassifier`: coefficients + intercept from a JSON artifact
//!
//! Both return `[P(stay), P(leave)]` per row. The explainer calls the same
//! trait on thousands of perturbed rows, so implementations take a batch.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logic::error::InferenceError;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

pub trait Classifier: Send + Sync {
    /// Short backend name for status output
    fn name(&self) -> &str;

    /// Number of input columns, when the backend knows it
    fn input_dim(&self) -> Option<usize>;

    /// Class probabilities for each row, `[P(stay), P(leave)]`
    fn predict_proba(&self, rows: ArrayView2<f64>) -> Result<Vec<[f64; 2]>, InferenceError>;
}

/// Turn a flat output buffer of `n` rows into probability pairs
fn to_pairs(data: &[f32], n: usize) -> Result<Vec<[f64; 2]>, InferenceError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    match data.len() / n {
        2 if data.len() == 2 * n => Ok(data
            .chunks_exact(2)
            .map(|c| [c[0] as f64, c[1] as f64])
            .collect()),
        1 if data.len() == n => Ok(data.iter().map(|p| [1.0 - *p as f64, *p as f64]).collect()),
        _ => Err(InferenceError::InvalidOutput(format!(
            "expected {} or {} values for {} rows, got {}",
            n,
            2 * n,
            n,
            data.len()
        ))),
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    input_dim: Option<usize>,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path, input_dim: Option<usize>) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| InferenceError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Runtime(format!("Failed to load model: {}", e)))?;

        // Prefer the probability head over the label head
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.to_lowercase().contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Runtime("No output defined".to_string()))?;

        log::info!("ONNX model loaded (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            input_dim,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    fn predict_proba(&self, rows: ArrayView2<f64>) -> Result<Vec<[f64; 2]>, InferenceError> {
        let n = rows.nrows();
        if let Some(dim) = self.input_dim {
            if rows.ncols() != dim {
                return Err(InferenceError::DimensionMismatch { expected: dim, actual: rows.ncols() });
            }
        }

        let input_array: Array2<f32> = rows.mapv(|v| v as f32);
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::InvalidOutput(format!("missing output {}", self.output_name)))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(format!("Extract error: {}", e)))?;

        to_pairs(output_tensor.1, n)
    }
}

// ============================================================================
// LOGISTIC IMPLEMENTATION
// ============================================================================

/// Linear model: `P(leave) = sigmoid(w·x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self { coefficients, intercept }
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticClassifier {
    fn name(&self) -> &str {
        "logistic"
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, rows: ArrayView2<f64>) -> Result<Vec<[f64; 2]>, InferenceError> {
        if rows.ncols() != self.coefficients.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: rows.ncols(),
            });
        }

        Ok(rows
            .rows()
            .into_iter()
            .map(|row| {
                let z: f64 = row
                    .iter()
                    .zip(self.coefficients.iter())
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    + self.intercept;
                let p = Self::sigmoid(z);
                [1.0 - p, p]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logistic_zero_logit_is_half() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0);
        let probs = model.predict_proba(array![[2.0, 2.0]].view()).unwrap();
        assert!((probs[0][0] - 0.5).abs() < 1e-12);
        assert!((probs[0][1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_batch() {
        let model = LogisticClassifier::new(vec![2.0], -1.0);
        let probs = model.predict_proba(array![[0.0], [5.0]].view()).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs[0][1] < 0.5);
        assert!(probs[1][1] > 0.99);
        for p in probs {
            assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_logistic_dimension_mismatch() {
        let model = LogisticClassifier::new(vec![1.0, 1.0, 1.0], 0.0);
        assert!(model.predict_proba(array![[1.0, 2.0]].view()).is_err());
    }

    #[test]
    fn test_to_pairs_shapes() {
        assert_eq!(to_pairs(&[0.25, 0.75], 1).unwrap(), vec![[0.25, 0.75]]);
        assert_eq!(to_pairs(&[0.25, 0.5], 2).unwrap(), vec![[0.75, 0.25], [0.5, 0.5]]);
        assert!(to_pairs(&[0.1, 0.2, 0.3], 2).is_err());
        assert!(to_pairs(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_logistic_from_json() {
        let model: LogisticClassifier =
            serde_json::from_str(r#"{"coefficients": [0.5, 1.5], "intercept": -0.2}"#).unwrap();
        assert_eq!(model.input_dim(), Some(2));
        assert_eq!(model.name(), "logistic");
    }
}
