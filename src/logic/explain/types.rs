use serde::{Deserialize, Serialize};

use super::labels::InsightCategory;

/// Raw explainer output as stored in the cache: descriptors + weights in
/// the explainer's order (descending |weight|).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedExplanation {
    pub features: Vec<String>,
    pub values: Vec<f64>,
    /// Weighted R² of the surrogate, when it was computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CachedExplanation {
    pub fn from_pairs(pairs: &[(String, f64)], score: Option<f64>) -> Self {
        Self {
            features: pairs.iter().map(|(d, _)| d.clone()).collect(),
            values: pairs.iter().map(|(_, w)| *w).collect(),
            score,
        }
    }

    /// Pairs in stored order. Extra names or values without a partner are dropped.
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.features.iter().cloned().zip(self.values.iter().copied()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    High,
    Medium,
    Low,
}

impl Strength {
    pub fn from_weight(weight: f64) -> Self {
        let magnitude = weight.abs();
        if magnitude > 0.08 {
            Strength::High
        } else if magnitude > 0.05 {
            Strength::Medium
        } else {
            Strength::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Pushes toward Leave
    IncreasesRisk,
    /// Pushes toward Stay
    DecreasesRisk,
}

impl Direction {
    pub fn from_weight(weight: f64) -> Self {
        if weight > 0.0 {
            Direction::IncreasesRisk
        } else {
            Direction::DecreasesRisk
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Explainer descriptor, e.g. "OverTime_Yes > 0.50"
    pub descriptor: String,
    /// Base model column extracted from the descriptor
    pub feature: String,
    /// Business-friendly label
    pub label: String,
    pub category: InsightCategory,
    pub weight: f64,
    pub direction: Direction,
    pub strength: Strength,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explanation {
    pub contributions: Vec<FeatureContribution>,
    pub from_cache: bool,
    /// User-visible note when no explanation could be produced
    pub warning: Option<String>,
    /// Surrogate fit quality (weighted R²)
    pub fidelity: Option<f64>,
}

impl Explanation {
    pub fn unavailable(warning: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_bands() {
        assert_eq!(Strength::from_weight(0.09), Strength::High);
        assert_eq!(Strength::from_weight(-0.09), Strength::High);
        assert_eq!(Strength::from_weight(0.08), Strength::Medium);
        assert_eq!(Strength::from_weight(0.06), Strength::Medium);
        assert_eq!(Strength::from_weight(0.05), Strength::Low);
        assert_eq!(Strength::from_weight(0.0), Strength::Low);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::from_weight(0.01), Direction::IncreasesRisk);
        assert_eq!(Direction::from_weight(-0.01), Direction::DecreasesRisk);
    }

    #[test]
    fn test_cached_explanation_from_artifact_shape() {
        let cached: CachedExplanation = serde_json::from_str(
            r#"{"features": ["OverTime_Yes > 0.50", "Age <= 30.00"], "values": [0.12, -0.04]}"#,
        )
        .unwrap();
        assert_eq!(cached.score, None);
        assert_eq!(
            cached.pairs(),
            vec![("OverTime_Yes > 0.50".to_string(), 0.12), ("Age <= 30.00".to_string(), -0.04)]
        );
    }
}
