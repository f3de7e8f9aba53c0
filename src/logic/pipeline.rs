//! Attrition Pipeline - one assessment per request
//!
//! ```text
//! EmployeeProfile -> normalize -> build -> predict -> explain
//!                        \-> risk factors (always)
//! ```
//!
//! Everything expensive (artifacts, strategy, explainer, background) is
//! set up once in `new`. `assess` is read-only apart from the shared cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::PipelineConfig;
use super::explain::{
    background, BackgroundSource, CacheStatus, Explanation, ExplanationCache, ExplanationService,
    LimeTabularExplainer,
};
use super::features::{
    build, normalize, EmployeeProfile, FeatureKey, FeatureSchema, ModelInputVector, ModelLayout, NormalizedProfile,
    QuickProfile,
};
use super::importance::{self, GlobalImportance};
use super::model::{
    FallbackPredictor, LivePredictor, ModelArtifacts, ModelMetadata, PredictionMode, PredictionResult,
    PredictionStrategy, Predictor, RiskThresholds, StandardScaler,
};
use super::risk_factors::{self, RiskFactor};

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Key facts shown above the prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub age: Option<f64>,
    pub monthly_income: Option<f64>,
    pub years_at_company: Option<f64>,
    pub job_level: String,
}

impl ProfileSummary {
    pub fn from_normalized(normalized: &NormalizedProfile) -> Self {
        let job_level = normalized
            .get(FeatureKey::JobLevel)
            .and_then(|code| FeatureSchema::global().describe(FeatureKey::JobLevel).label_for(code as i64))
            .unwrap_or("Unknown")
            .to_string();

        Self {
            age: normalized.get(FeatureKey::Age),
            monthly_income: normalized.get(FeatureKey::MonthlyIncome),
            years_at_company: normalized.get(FeatureKey::YearsAtCompany),
            job_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub mode: PredictionMode,
    pub summary: ProfileSummary,
    pub normalized: NormalizedProfile,
    /// Absent when inference failed
    pub prediction: Option<PredictionResult>,
    pub error: Option<String>,
    pub explanation: Explanation,
    pub risk_factors: Vec<RiskFactor>,
}

/// Model status for the info panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub mode: PredictionMode,
    pub classifier: String,
    pub metadata: ModelMetadata,
    pub columns: usize,
    pub layout_hash: u32,
    pub explainer_enabled: bool,
    pub background: BackgroundSource,
    pub artifact_dir: String,
    pub warnings: Vec<String>,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct AttritionPipeline {
    config: PipelineConfig,
    layout: ModelLayout,
    strategy: PredictionStrategy,
    explanations: ExplanationService,
    metadata: ModelMetadata,
    importance: GlobalImportance,
    warnings: Vec<String>,
}

impl AttritionPipeline {
    /// Load artifacts from the configured directory and build the pipeline
    pub fn from_config(config: PipelineConfig) -> Self {
        let artifacts = ModelArtifacts::load(&config.artifact_dir);
        Self::new(artifacts, config)
    }

    /// Demo pipeline without any artifacts
    pub fn demo() -> Self {
        Self::new(ModelArtifacts::empty(), PipelineConfig::default())
    }

    pub fn new(artifacts: ModelArtifacts, config: PipelineConfig) -> Self {
        let cache = Arc::new(ExplanationCache::new(config.cache_capacity));
        Self::with_cache(artifacts, config, cache)
    }

    /// Build with an externally owned explanation cache
    pub fn with_cache(artifacts: ModelArtifacts, config: PipelineConfig, cache: Arc<ExplanationCache>) -> Self {
        let mut artifacts = artifacts;

        if !artifacts.explanation_cache.is_empty() {
            let entries = std::mem::take(&mut artifacts.explanation_cache);
            let loaded = cache.seed(entries);
            log::info!("Explanation cache seeded with {} entries", loaded);
        }

        let strategy = match artifacts.classifier.clone() {
            Some(classifier) => {
                let scaler = artifacts.scaler.clone().unwrap_or_else(|| {
                    log::info!("No scaler artifact - model input is passed through unscaled");
                    StandardScaler::identity(artifacts.layout.len())
                });
                log::info!("Using live {} classifier ({} columns)", classifier.name(), artifacts.layout.len());
                PredictionStrategy::Live(LivePredictor::new(
                    classifier,
                    scaler,
                    artifacts.layout.clone(),
                    RiskThresholds::default(),
                ))
            }
            None => {
                log::info!("Model artifacts not available - using demo heuristic");
                PredictionStrategy::Fallback(FallbackPredictor::new(RiskThresholds::default()))
            }
        };

        let explanations = Self::build_explanations(&strategy, &artifacts, &config, cache);
        let importance = importance::global_importance(artifacts.importance.as_ref(), &artifacts.descriptions);

        let mut warnings = artifacts.warnings;
        if let Some(warning) = &importance.warning {
            warnings.push(warning.clone());
        }

        Self {
            config,
            layout: artifacts.layout,
            strategy,
            explanations,
            metadata: artifacts.metadata,
            importance,
            warnings,
        }
    }

    fn build_explanations(
        strategy: &PredictionStrategy,
        artifacts: &ModelArtifacts,
        config: &PipelineConfig,
        cache: Arc<ExplanationCache>,
    ) -> ExplanationService {
        if !config.explain_enabled {
            return ExplanationService::disabled("penjelasan dinonaktifkan", cache);
        }
        let Some(live) = strategy.as_live() else {
            return ExplanationService::disabled("model tidak tersedia (mode demo)", cache);
        };

        let explainer = background::generate(
            config.background,
            config.background_samples,
            config.random_seed,
            live.layout(),
            live.scaler(),
            artifacts.background_rows.as_deref(),
        )
        .and_then(|rows| {
            LimeTabularExplainer::new(
                &rows,
                live.layout().columns().to_vec(),
                artifacts.explainer_config.clone(),
                config.random_seed,
            )
        });

        match explainer {
            Ok(explainer) => {
                log::info!(
                    "Explainer ready ({} background, {} samples)",
                    config.background,
                    artifacts.explainer_config.num_samples
                );
                ExplanationService::new(Box::new(explainer), cache, artifacts.explainer_config.num_features)
            }
            Err(e) => {
                log::warn!("Explainer setup failed: {}", e);
                ExplanationService::disabled(e.to_string(), cache)
            }
        }
    }

    pub fn mode(&self) -> PredictionMode {
        self.strategy.mode()
    }

    pub fn layout(&self) -> &ModelLayout {
        &self.layout
    }

    pub fn assess(&self, profile: &EmployeeProfile) -> AssessmentReport {
        let normalized = normalize(profile);
        let vector = build(&normalized, &self.layout);
        log::debug!("Model input: {}", vector.to_log_entry(&self.layout));
        let risk_factors = risk_factors::evaluate(&normalized);

        let (prediction, error, explanation) = match self.strategy.predict(&normalized, &vector) {
            Ok(prediction) => {
                let explanation = self.explain(&normalized, &vector);
                (Some(prediction), None, explanation)
            }
            Err(e) => {
                log::error!("Inference failed: {}", e);
                (
                    None,
                    Some(format!("Prediksi gagal: {}", e)),
                    Explanation::unavailable("Penjelasan dilewati karena prediksi gagal"),
                )
            }
        };

        AssessmentReport {
            id: Uuid::new_v4(),
            assessed_at: Utc::now(),
            mode: self.mode(),
            summary: ProfileSummary::from_normalized(&normalized),
            normalized,
            prediction,
            error,
            explanation,
            risk_factors,
        }
    }

    pub fn assess_preset(&self, preset: QuickProfile) -> AssessmentReport {
        self.assess(&preset.profile())
    }

    fn explain(&self, normalized: &NormalizedProfile, vector: &ModelInputVector) -> Explanation {
        let Some(live) = self.strategy.as_live() else {
            return Explanation::unavailable("Penjelasan tidak tersedia dalam mode demo");
        };
        match live.scale(vector) {
            Ok(scaled) => self.explanations.explain(normalized, &scaled, live.classifier().as_ref()),
            Err(e) => {
                log::warn!("Explanation skipped: {}", e);
                Explanation::unavailable(format!("Penjelasan tidak dapat dibuat: {}", e))
            }
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        let classifier = self
            .strategy
            .as_live()
            .map(|live| live.classifier().name().to_string())
            .unwrap_or_else(|| "heuristic".to_string());

        ModelInfo {
            mode: self.mode(),
            classifier,
            metadata: self.metadata.clone(),
            columns: self.layout.len(),
            layout_hash: self.layout.hash(),
            explainer_enabled: self.explanations.is_enabled(),
            background: self.config.background,
            artifact_dir: self.config.artifact_dir.display().to_string(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn global_importance(&self) -> &GlobalImportance {
        &self.importance
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.explanations.cache().status()
    }
}

// ============================================================================
// TESTS
// ============================================================================
