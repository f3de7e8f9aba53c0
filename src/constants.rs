//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Every value can be overridden through the environment (see `logic::config`).

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_ARTIFACT_DIR: &str = "models";

/// Default capacity of the explanation cache (entries)
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Default number of background rows for the surrogate explainer
pub const DEFAULT_BACKGROUND_SAMPLES: usize = 100;

/// Seed used for every seeded sampling step (background + perturbations)
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Attrition Core";

// ============================================
// Artifact file names
// ============================================

pub const ONNX_MODEL_FILE: &str = "model.onnx";
pub const LOGISTIC_MODEL_FILE: &str = "logistic_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const METADATA_FILE: &str = "model_metadata.json";
pub const IMPORTANCE_FILE: &str = "global_feature_importance.json";
pub const DESCRIPTIONS_FILE: &str = "feature_descriptions.json";
pub const EXPLAINER_CONFIG_FILE: &str = "explainer_config.json";
pub const EXPLANATION_CACHE_FILE: &str = "explanation_cache.json";
pub const BACKGROUND_FILE: &str = "background.json";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact directory from environment or use default
pub fn get_artifact_dir() -> String {
    std::env::var("ATTRITION_ARTIFACT_DIR")
        .unwrap_or_else(|_| DEFAULT_ARTIFACT_DIR.to_string())
}

/// Get explanation cache capacity from environment or use default
pub fn get_cache_capacity() -> usize {
    std::env::var("ATTRITION_CACHE_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
        .unwrap_or(DEFAULT_CACHE_CAPACITY)
}

/// Get background sample count from environment or use default
pub fn get_background_samples() -> usize {
    std::env::var("ATTRITION_BACKGROUND_SAMPLES")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
        .unwrap_or(DEFAULT_BACKGROUND_SAMPLES)
}

/// Get background source name ("schema", "noise", "file") from environment
pub fn get_background_source() -> Option<String> {
    std::env::var("ATTRITION_BACKGROUND").ok()
}

/// Check if local explanations are enabled
pub fn is_explain_enabled() -> bool {
    std::env::var("ATTRITION_EXPLAIN_ENABLED")
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true)
}
