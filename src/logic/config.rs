//! Pipeline Configuration
//!
//! Runtime configuration for the attrition pipeline.
//! Can be loaded from the environment or set programmatically.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::constants;
use super::explain::BackgroundSource;

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the persisted model artifacts
    pub artifact_dir: PathBuf,
    /// Maximum number of cached explanations
    pub cache_capacity: usize,
    /// Reference distribution for the surrogate explainer
    pub background: BackgroundSource,
    /// Number of rows in the generated background dataset
    pub background_samples: usize,
    /// Seed for background generation and perturbation sampling
    pub random_seed: u64,
    /// Kill-switch for local explanations
    pub explain_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(constants::DEFAULT_ARTIFACT_DIR),
            cache_capacity: constants::DEFAULT_CACHE_CAPACITY,
            background: BackgroundSource::Schema,
            background_samples: constants::DEFAULT_BACKGROUND_SAMPLES,
            random_seed: constants::DEFAULT_RANDOM_SEED,
            explain_enabled: true,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let background = match constants::get_background_source() {
            Some(name) => name.parse().unwrap_or_else(|_| {
                log::warn!("Unknown background source '{}', using schema sampling", name);
                BackgroundSource::Schema
            }),
            None => BackgroundSource::Schema,
        };

        Self {
            artifact_dir: PathBuf::from(constants::get_artifact_dir()),
            cache_capacity: constants::get_cache_capacity(),
            background,
            background_samples: constants::get_background_samples(),
            random_seed: constants::DEFAULT_RANDOM_SEED,
            explain_enabled: constants::is_explain_enabled(),
        }
    }

    /// Configuration pointing at a specific artifact directory
    pub fn with_artifact_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: dir.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.background, BackgroundSource::Schema);
        assert_eq!(config.random_seed, 42);
        assert!(config.explain_enabled);
    }

    #[test]
    fn test_with_artifact_dir() {
        let config = PipelineConfig::with_artifact_dir("/tmp/artifacts");
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/artifacts"));
        assert_eq!(config.background_samples, 100);
    }
}
