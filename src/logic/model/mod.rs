//! Model Module - attrition classifier and prediction strategies
//!
//! Artifacts are loaded once; the prediction strategy (live model or
//! demo heuristic) is fixed for the life of the pipeline.

pub mod artifacts;
pub mod classifier;
pub mod scaler;
pub mod inference;
pub mod threshold;

// Re-export common types
pub use artifacts::{ModelArtifacts, ModelMetadata};
pub use classifier::{Classifier, LogisticClassifier, OnnxClassifier};
pub use scaler::StandardScaler;
pub use inference::{
    AttritionClass, FallbackPredictor, LivePredictor, PredictionMode, PredictionResult, PredictionStrategy, Predictor,
};
pub use threshold::{RiskLevel, RiskThresholds};
