//! Model Input Vector - ordered numeric input for the classifier
//!
//! Built from a normalized profile against a `ModelLayout`:
//! - direct fields are copied into the column with the same name
//! - nominal fields are expanded into one-hot indicator columns
//! - every other column stays zero (lenient fill, not a validation pass)

use serde::{Deserialize, Serialize};

use super::layout::{ModelColumn, ModelLayout};
use super::profile::NormalizedProfile;
use super::schema::FeatureKey;

// ============================================================================
// MAPPINGS
// ============================================================================

/// Semantic fields copied 1:1 into a model column
const DIRECT_COLUMNS: &[(FeatureKey, ModelColumn)] = &[
    (FeatureKey::Age, ModelColumn::Age),
    (FeatureKey::MonthlyIncome, ModelColumn::MonthlyIncome),
    (FeatureKey::YearsAtCompany, ModelColumn::YearsAtCompany),
    (FeatureKey::YearsInCurrentRole, ModelColumn::YearsInCurrentRole),
    (FeatureKey::YearsSinceLastPromotion, ModelColumn::YearsSinceLastPromotion),
    (FeatureKey::DistanceFromHome, ModelColumn::DistanceFromHome),
    (FeatureKey::PercentSalaryHike, ModelColumn::PercentSalaryHike),
    (FeatureKey::JobLevel, ModelColumn::JobLevel),
    (FeatureKey::StockOptionLevel, ModelColumn::StockOptionLevel),
    (FeatureKey::JobSatisfaction, ModelColumn::JobSatisfaction),
    (FeatureKey::WorkLifeBalance, ModelColumn::WorkLifeBalance),
    (FeatureKey::EnvironmentSatisfaction, ModelColumn::EnvironmentSatisfaction),
    (FeatureKey::PerformanceRating, ModelColumn::PerformanceRating),
];

/// One-hot indicators: column is 1 iff the source code equals the category code
const ONE_HOT_COLUMNS: &[(FeatureKey, i64, ModelColumn)] = &[
    (FeatureKey::Gender, 1, ModelColumn::GenderMale),
    (FeatureKey::MaritalStatus, 1, ModelColumn::MaritalStatusMarried),
    (FeatureKey::MaritalStatus, 0, ModelColumn::MaritalStatusSingle),
    (FeatureKey::OverTime, 1, ModelColumn::OverTimeYes),
    (FeatureKey::BusinessTravel, 2, ModelColumn::BusinessTravelFrequently),
    (FeatureKey::BusinessTravel, 1, ModelColumn::BusinessTravelRarely),
];

// ============================================================================
// MODEL INPUT VECTOR
// ============================================================================

/// Feature vector stamped with the layout it was built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInputVector {
    /// Hash of the layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in layout order
    pub values: Vec<f64>,
}

impl ModelInputVector {
    /// Zeroed vector for a layout
    pub fn zeros(layout: &ModelLayout) -> Self {
        Self {
            layout_hash: layout.hash(),
            values: vec![0.0; layout.len()],
        }
    }

    pub fn from_values(layout: &ModelLayout, values: Vec<f64>) -> Self {
        Self { layout_hash: layout.hash(), values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by column name
    pub fn get_by_name(&self, layout: &ModelLayout, name: &str) -> Option<f64> {
        layout.index_of(name).and_then(|i| self.get(i))
    }

    /// Set feature by column name. Returns false when the layout lacks it.
    pub fn set_by_name(&mut self, layout: &ModelLayout, name: &str, value: f64) -> bool {
        match layout.index_of(name) {
            Some(index) if index < self.values.len() => {
                self.values[index] = value;
                true
            }
            _ => false,
        }
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, layout: &ModelLayout) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "named_values": layout.columns().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Map a normalized profile onto the model's column list
pub fn build(normalized: &NormalizedProfile, layout: &ModelLayout) -> ModelInputVector {
    let mut vector = ModelInputVector::zeros(layout);

    for (key, column) in DIRECT_COLUMNS {
        if let Some(value) = normalized.get(*key) {
            vector.set_by_name(layout, column.as_str(), value);
        }
    }

    for (key, code, column) in ONE_HOT_COLUMNS {
        if let Some(value) = normalized.get(*key) {
            let indicator = if value == *code as f64 { 1.0 } else { 0.0 };
            vector.set_by_name(layout, column.as_str(), indicator);
        }
    }

    vector
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn marital(code: f64) -> (f64, f64) {
        let layout = ModelLayout::default_layout();
        let normalized = NormalizedProfile::new().with(FeatureKey::MaritalStatus, code);
        let vector = build(&normalized, &layout);
        (
            vector.get_by_name(&layout, "MaritalStatus_Married").unwrap(),
            vector.get_by_name(&layout, "MaritalStatus_Single").unwrap(),
        )
    }

    #[test]
    fn test_empty_profile_is_all_zero() {
        let layout = ModelLayout::default_layout();
        let vector = build(&NormalizedProfile::new(), &layout);
        assert_eq!(vector.len(), layout.len());
        assert!(vector.values.iter().all(|v| *v == 0.0));
        assert_eq!(vector.layout_hash, layout.hash());
    }

    #[test]
    fn test_length_follows_layout() {
        let layout = ModelLayout::new(vec![
            "JobInvolvement".into(),
            "Age".into(),
            "Department_Sales".into(),
        ]);
        let normalized = NormalizedProfile::new()
            .with(FeatureKey::Age, 41.0)
            .with(FeatureKey::MonthlyIncome, 9000.0);
        let vector = build(&normalized, &layout);
        assert_eq!(vector.values, vec![0.0, 41.0, 0.0]);
    }

    #[test]
    fn test_order_independent_of_profile_order() {
        let layout = ModelLayout::default_layout();
        let a = NormalizedProfile::new()
            .with(FeatureKey::PerformanceRating, 3.0)
            .with(FeatureKey::Age, 30.0);
        let b = NormalizedProfile::new()
            .with(FeatureKey::Age, 30.0)
            .with(FeatureKey::PerformanceRating, 3.0);
        assert_eq!(build(&a, &layout), build(&b, &layout));
        assert_eq!(build(&a, &layout).get(0), Some(30.0));
    }

    #[test]
    fn test_marital_one_hot_is_exclusive() {
        assert_eq!(marital(0.0), (0.0, 1.0));
        assert_eq!(marital(1.0), (1.0, 0.0));
        // divorced: neither indicator
        assert_eq!(marital(2.0), (0.0, 0.0));
    }

    #[test]
    fn test_business_travel_one_hot() {
        let layout = ModelLayout::default_layout();
        for (code, frequently, rarely) in [(0.0, 0.0, 0.0), (1.0, 0.0, 1.0), (2.0, 1.0, 0.0)] {
            let normalized = NormalizedProfile::new().with(FeatureKey::BusinessTravel, code);
            let vector = build(&normalized, &layout);
            assert_eq!(vector.get_by_name(&layout, "BusinessTravel_Travel_Frequently"), Some(frequently));
            assert_eq!(vector.get_by_name(&layout, "BusinessTravel_Travel_Rarely"), Some(rarely));
        }
    }

    #[test]
    fn test_overtime_and_gender_indicators() {
        let layout = ModelLayout::default_layout();
        let normalized = NormalizedProfile::new()
            .with(FeatureKey::OverTime, 1.0)
            .with(FeatureKey::Gender, 0.0);
        let vector = build(&normalized, &layout);
        assert_eq!(vector.get_by_name(&layout, "OverTime_Yes"), Some(1.0));
        assert_eq!(vector.get_by_name(&layout, "Gender_Male"), Some(0.0));
    }

    #[test]
    fn test_to_log_entry() {
        let layout = ModelLayout::default_layout();
        let vector = build(&NormalizedProfile::new().with(FeatureKey::Age, 25.0), &layout);
        let log = vector.to_log_entry(&layout);
        assert_eq!(log["named_values"]["Age"], 25.0);
        assert!(log["layout_hash"].as_u64().is_some());
    }
}
