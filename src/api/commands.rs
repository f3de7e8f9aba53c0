//! Commands - API for the dashboard and CLI
//!
//! One pipeline per process. It is built on first use from the environment
//! unless `init` was called first with an explicit configuration.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::explain::CacheStatus;
use crate::logic::features::{EmployeeProfile, FeatureDefinition, FeatureSchema, PresetInfo, QuickProfile};
use crate::logic::importance::GlobalImportance;
use crate::logic::{AssessmentReport, AttritionPipeline, ModelInfo, PipelineConfig};

static PIPELINE: OnceCell<AttritionPipeline> = OnceCell::new();

fn pipeline() -> &'static AttritionPipeline {
    PIPELINE.get_or_init(|| AttritionPipeline::from_config(PipelineConfig::from_env()))
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Application banner for the info panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub model: ModelInfo,
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Build the pipeline with an explicit configuration. Only the first call wins.
pub fn init(config: PipelineConfig) -> Result<ModelInfo, String> {
    let mut created = false;
    let pipeline = PIPELINE.get_or_init(|| {
        created = true;
        AttritionPipeline::from_config(config)
    });
    if !created {
        return Err("Pipeline already initialized".to_string());
    }
    Ok(pipeline.model_info())
}

pub fn is_initialized() -> bool {
    PIPELINE.get().is_some()
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// An empty profile is valid: every field takes its absent-field default
pub fn assess_profile(profile: EmployeeProfile) -> Result<AssessmentReport, String> {
    Ok(pipeline().assess(&profile))
}

/// Profile as a JSON object of field name -> label or number
pub fn assess_profile_json(json: &str) -> Result<AssessmentReport, String> {
    let profile = EmployeeProfile::from_json(json).map_err(|e| format!("Invalid profile: {}", e))?;
    assess_profile(profile)
}

pub fn assess_preset(preset: &str) -> Result<AssessmentReport, String> {
    let preset: QuickProfile = preset.parse().map_err(|e| format!("{}", e))?;
    Ok(pipeline().assess_preset(preset))
}

// ============================================================================
// MODEL & DASHBOARD DATA
// ============================================================================

pub fn get_model_info() -> Result<ModelInfo, String> {
    Ok(pipeline().model_info())
}

pub fn get_app_info() -> Result<AppInfo, String> {
    Ok(AppInfo {
        name: constants::APP_NAME.to_string(),
        version: constants::APP_VERSION.to_string(),
        model: pipeline().model_info(),
    })
}

pub fn get_global_importance() -> Result<GlobalImportance, String> {
    Ok(pipeline().global_importance().clone())
}

pub fn get_feature_schema() -> Result<Vec<FeatureDefinition>, String> {
    Ok(FeatureSchema::global().definitions().to_vec())
}

pub fn list_presets() -> Result<Vec<PresetInfo>, String> {
    Ok(QuickProfile::ALL.iter().map(|p| p.info()).collect())
}

pub fn get_cache_status() -> Result<CacheStatus, String> {
    Ok(pipeline().cache_status())
}

// ============================================================================
// TESTS
// ============================================================================
