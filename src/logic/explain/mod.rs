//! Explain Module - why the model predicted what it did
//!
//! - `lime` - local surrogate explainer
//! - `background` - dataset the explainer learns distributions from
//! - `engine` - cached explanation service
//! - `labels` - descriptor parsing and business labels

pub mod types;
pub mod labels;
pub mod lime;
pub mod background;
pub mod engine;

pub use types::{CachedExplanation, Direction, Explanation, FeatureContribution, Strength};
pub use labels::InsightCategory;
pub use lime::{DistanceMetric, ExplainerConfig, LimeTabularExplainer, LocalExplainer, SurrogateFit};
pub use background::BackgroundSource;
pub use engine::{CacheStatus, ExplanationCache, ExplanationService};
