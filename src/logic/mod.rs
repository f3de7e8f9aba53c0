//! Logic Module - Inference & Explanation Engines
//!
//! - `features/` - Schema, normalization, model input layout
//! - `model/` - Artifacts, classifiers, live/fallback prediction
//! - `explain/` - Local surrogate explanations and their cache
//! - `pipeline` - One assessment per request

pub mod config;
pub mod error;

pub mod features;
pub mod model;
pub mod explain;

pub mod risk_factors;
pub mod importance;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::{AssessmentReport, AttritionPipeline, ModelInfo, ProfileSummary};
