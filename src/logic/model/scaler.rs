//! Standard Scaler - per-column standardization fitted at training time

use serde::{Deserialize, Serialize};

use crate::logic::error::InferenceError;

/// Scaling parameters from training: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Pass-through scaler (mean 0, scale 1)
    pub fn identity(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            scale: vec![1.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Artifact sanity: mean and scale describe the same columns
    pub fn is_consistent(&self) -> bool {
        self.mean.len() == self.scale.len()
    }

    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if values.len() != self.dim() || !self.is_consistent() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.dim(),
                actual: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // constant columns were fitted with scale 0
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.0]);
        let scaled = scaler.transform(&[14.0, 3.0]).unwrap();
        assert_eq!(scaled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let scaler = StandardScaler::identity(3);
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, InferenceError::DimensionMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_from_json() {
        let scaler: StandardScaler = serde_json::from_str(r#"{"mean": [1.0], "scale": [0.5]}"#).unwrap();
        assert_eq!(scaler.transform(&[2.0]).unwrap(), vec![2.0]);
    }
}
