//! Features Module - HR input schema and model-input construction
//!
//! Raw form values flow through three pure steps:
//! `EmployeeProfile` -> `normalize` -> `NormalizedProfile` -> `build` -> `ModelInputVector`

pub mod schema;
pub mod profile;
pub mod normalizer;
pub mod layout;
pub mod vector;
pub mod presets;

#[cfg(test)]
mod tests;

// Re-export common types
pub use schema::{FeatureDefinition, FeatureDomain, FeatureKey, FeatureKind, FeatureSchema};
pub use profile::{EmployeeProfile, NormalizedProfile, RawValue};
pub use normalizer::normalize;
pub use layout::{ModelColumn, ModelLayout, LayoutMismatchError, DEFAULT_MODEL_COLUMNS};
pub use vector::{build, ModelInputVector};
pub use presets::{PresetInfo, QuickProfile};
