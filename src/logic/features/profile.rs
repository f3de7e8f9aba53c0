//! Employee profiles - raw (form values) and normalized (model codes)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::FeatureKey;

// ============================================================================
// RAW PROFILE
// ============================================================================

/// A single form value: display label (categorical) or number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Label(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Label(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Label(value)
    }
}

/// Raw profile as entered by the user (one per request)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeProfile(BTreeMap<String, RawValue>);

impl EmployeeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a flat JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// NORMALIZED PROFILE
// ============================================================================

/// Same fields as the raw profile, every value numeric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedProfile(BTreeMap<FeatureKey, f64>);

impl NormalizedProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn with(mut self, key: FeatureKey, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// Value or a caller-chosen default when the field is absent
    pub fn get_or(&self, key: FeatureKey, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable serialization of the content, sorted by field name.
    /// Identical content always yields an identical key.
    pub fn cache_key(&self) -> String {
        let mut pairs: Vec<(&'static str, f64)> = self.iter().map(|(k, v)| (k.as_str(), v)).collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let body: Vec<String> = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, format_value(*value)))
            .collect();
        format!("[{}]", body.join(";"))
    }
}

/// Integral values print without a fractional part so 3 and 3.0 share a key
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_json() {
        let profile = EmployeeProfile::from_json(r#"{"Age": 30, "OverTime": "Ya"}"#).unwrap();
        assert_eq!(profile.get("Age"), Some(&RawValue::Number(30.0)));
        assert_eq!(profile.get("OverTime"), Some(&RawValue::Label("Ya".to_string())));
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_cache_key_sorted_by_name() {
        let a = NormalizedProfile::new()
            .with(FeatureKey::OverTime, 1.0)
            .with(FeatureKey::Age, 30.0);
        let b = NormalizedProfile::new()
            .with(FeatureKey::Age, 30.0)
            .with(FeatureKey::OverTime, 1.0);

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "[Age=30;OverTime=1]");
    }

    #[test]
    fn test_cache_key_distinguishes_values() {
        let a = NormalizedProfile::new().with(FeatureKey::MonthlyIncome, 5000.0);
        let b = NormalizedProfile::new().with(FeatureKey::MonthlyIncome, 5000.5);
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_format_from_labels() {
        let profile = EmployeeProfile::new()
            .with("OverTime", "Ya")
            .with("JobSatisfaction", "Rendah")
            .with("Age", 30.0)
            .with("MonthlyIncome", 5000.5);
        let normalized = crate::logic::features::normalize(&profile);

        assert_eq!(
            normalized.cache_key(),
            "[Age=30;JobSatisfaction=1;MonthlyIncome=5000.5;OverTime=1]"
        );
        assert_eq!(NormalizedProfile::new().cache_key(), "[]");
    }

    #[test]
    fn test_get_or_default() {
        let profile = NormalizedProfile::new().with(FeatureKey::JobSatisfaction, 1.0);
        assert_eq!(profile.get_or(FeatureKey::JobSatisfaction, 3.0), 1.0);
        assert_eq!(profile.get_or(FeatureKey::WorkLifeBalance, 3.0), 3.0);
    }
}
