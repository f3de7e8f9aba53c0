//! Prediction Service - attrition probability for one employee
//!
//! The strategy is chosen ONCE when the pipeline starts:
//! - `LivePredictor`: trained classifier + scaler loaded from artifacts
//! - `FallbackPredictor`: closed-form heuristic used in demo mode
//!
//! Per request there is no "try the model, else fall back" branching.

use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use super::scaler::StandardScaler;
use super::threshold::{RiskLevel, RiskThresholds};
use crate::logic::error::InferenceError;
use crate::logic::features::{FeatureKey, ModelInputVector, ModelLayout, NormalizedProfile};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttritionClass {
    Stay,
    Leave,
}

/// Which strategy produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    Live,
    Fallback,
}

/// Prediction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: AttritionClass,
    /// `[P(stay), P(leave)]`, sums to 1
    pub probabilities: [f64; 2],
    pub risk_level: RiskLevel,
    /// max(P(stay), P(leave))
    pub confidence: f64,
    pub method: PredictionMode,
    pub inference_time_us: u64,
}

impl PredictionResult {
    pub fn from_probability(
        p_leave: f64,
        thresholds: &RiskThresholds,
        method: PredictionMode,
        inference_time_us: u64,
    ) -> Self {
        let p_stay = 1.0 - p_leave;
        Self {
            label: if thresholds.is_leave(p_leave) { AttritionClass::Leave } else { AttritionClass::Stay },
            probabilities: [p_stay, p_leave],
            risk_level: thresholds.risk_level(p_leave),
            confidence: p_stay.max(p_leave),
            method,
            inference_time_us,
        }
    }

    pub fn p_leave(&self) -> f64 {
        self.probabilities[1]
    }
}

// ============================================================================
// PREDICTOR TRAIT
// ============================================================================

pub trait Predictor: Send + Sync {
    fn mode(&self) -> PredictionMode;

    fn predict(
        &self,
        normalized: &NormalizedProfile,
        vector: &ModelInputVector,
    ) -> Result<PredictionResult, InferenceError>;
}

// ============================================================================
// LIVE PREDICTOR
// ============================================================================

pub struct LivePredictor {
    classifier: Arc<dyn Classifier>,
    scaler: StandardScaler,
    layout: ModelLayout,
    thresholds: RiskThresholds,
}

impl LivePredictor {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        scaler: StandardScaler,
        layout: ModelLayout,
        thresholds: RiskThresholds,
    ) -> Self {
        Self { classifier, scaler, layout, thresholds }
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn layout(&self) -> &ModelLayout {
        &self.layout
    }

    /// Validate the vector against the model layout, then standardize it
    pub fn scale(&self, vector: &ModelInputVector) -> Result<Vec<f64>, InferenceError> {
        self.layout.validate(vector.layout_hash, vector.len())?;
        self.scaler.transform(vector.as_slice())
    }

    /// Reject NaN / negative / zero-sum output, then renormalize the pair
    fn renormalize(pair: [f64; 2]) -> Result<[f64; 2], InferenceError> {
        let [p0, p1] = pair;
        if !p0.is_finite() || !p1.is_finite() || p0 < 0.0 || p1 < 0.0 {
            return Err(InferenceError::InvalidOutput(format!("probabilities [{}, {}]", p0, p1)));
        }
        let sum = p0 + p1;
        if sum <= 0.0 {
            return Err(InferenceError::InvalidOutput("probabilities sum to zero".to_string()));
        }
        Ok([p0 / sum, p1 / sum])
    }
}

impl Predictor for LivePredictor {
    fn mode(&self) -> PredictionMode {
        PredictionMode::Live
    }

    fn predict(
        &self,
        _normalized: &NormalizedProfile,
        vector: &ModelInputVector,
    ) -> Result<PredictionResult, InferenceError> {
        let start_time = Instant::now();

        let scaled = self.scale(vector)?;
        let dim = scaled.len();
        let row = Array2::from_shape_vec((1, dim), scaled)
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let probabilities = self.classifier.predict_proba(row.view())?;
        let pair = probabilities
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InvalidOutput("empty output".to_string()))?;
        let [_, p_leave] = Self::renormalize(pair)?;

        let inference_time = start_time.elapsed().as_micros() as u64;
        Ok(PredictionResult::from_probability(
            p_leave,
            &self.thresholds,
            PredictionMode::Live,
            inference_time,
        ))
    }
}

// ============================================================================
// FALLBACK PREDICTOR
// ============================================================================

/// Demo-mode heuristic:
/// `clamp(0.05, 0.95, 0.3 + 0.2·OT + 0.3·(1 − JS/4) + 0.2·(1 − WLB/4))`
#[derive(Debug, Clone, Default)]
pub struct FallbackPredictor {
    thresholds: RiskThresholds,
}

impl FallbackPredictor {
    pub const MIN_PROBABILITY: f64 = 0.05;
    pub const MAX_PROBABILITY: f64 = 0.95;

    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// Heuristic P(leave). Absent fields: OverTime 0, JobSatisfaction 3, WorkLifeBalance 3.
    pub fn score(normalized: &NormalizedProfile) -> f64 {
        let overtime = normalized.get_or(FeatureKey::OverTime, 0.0);
        let job_satisfaction = normalized.get_or(FeatureKey::JobSatisfaction, 3.0);
        let work_life_balance = normalized.get_or(FeatureKey::WorkLifeBalance, 3.0);

        let p = 0.3
            + 0.2 * overtime
            + 0.3 * (1.0 - job_satisfaction / 4.0)
            + 0.2 * (1.0 - work_life_balance / 4.0);

        p.clamp(Self::MIN_PROBABILITY, Self::MAX_PROBABILITY)
    }
}

impl Predictor for FallbackPredictor {
    fn mode(&self) -> PredictionMode {
        PredictionMode::Fallback
    }

    fn predict(
        &self,
        normalized: &NormalizedProfile,
        _vector: &ModelInputVector,
    ) -> Result<PredictionResult, InferenceError> {
        let start_time = Instant::now();
        let p_leave = Self::score(normalized);
        let inference_time = start_time.elapsed().as_micros() as u64;
        Ok(PredictionResult::from_probability(
            p_leave,
            &self.thresholds,
            PredictionMode::Fallback,
            inference_time,
        ))
    }
}

// ============================================================================
// STRATEGY
// ============================================================================

/// The strategy selected at startup
pub enum PredictionStrategy {
    Live(LivePredictor),
    Fallback(FallbackPredictor),
}

impl PredictionStrategy {
    pub fn as_live(&self) -> Option<&LivePredictor> {
        match self {
            PredictionStrategy::Live(live) => Some(live),
            PredictionStrategy::Fallback(_) => None,
        }
    }
}

impl Predictor for PredictionStrategy {
    fn mode(&self) -> PredictionMode {
        match self {
            PredictionStrategy::Live(p) => p.mode(),
            PredictionStrategy::Fallback(p) => p.mode(),
        }
    }

    fn predict(
        &self,
        normalized: &NormalizedProfile,
        vector: &ModelInputVector,
    ) -> Result<PredictionResult, InferenceError> {
        match self {
            PredictionStrategy::Live(p) => p.predict(normalized, vector),
            PredictionStrategy::Fallback(p) => p.predict(normalized, vector),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{build, normalize, EmployeeProfile};
    use crate::logic::model::classifier::LogisticClassifier;
    use ndarray::ArrayView2;

    fn assess_fallback(profile: &EmployeeProfile) -> PredictionResult {
        let layout = ModelLayout::default_layout();
        let normalized = normalize(profile);
        let vector = build(&normalized, &layout);
        FallbackPredictor::default().predict(&normalized, &vector).unwrap()
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let profile = EmployeeProfile::new()
            .with("OverTime", "Ya")
            .with("JobSatisfaction", "Sedang")
            .with("WorkLifeBalance", "Lebih Baik")
            .with("Age", 41.0);

        let first = assess_fallback(&profile);
        for _ in 0..5 {
            let again = assess_fallback(&profile);
            assert_eq!(again.probabilities[0].to_bits(), first.probabilities[0].to_bits());
            assert_eq!(again.probabilities[1].to_bits(), first.probabilities[1].to_bits());
            assert_eq!(again.label, first.label);
        }
        assert!((first.probabilities[0] + first.probabilities[1] - 1.0).abs() < 1e-6);
        assert_eq!(
            FallbackPredictor::score(&normalize(&profile)).to_bits(),
            first.p_leave().to_bits()
        );
    }

    #[test]
    fn test_fallback_high_risk_profile() {
        let profile = EmployeeProfile::new()
            .with("OverTime", "Ya")
            .with("JobSatisfaction", "Rendah")
            .with("WorkLifeBalance", "Buruk");
        let result = assess_fallback(&profile);
        assert!((result.p_leave() - 0.875).abs() < 1e-9);
        assert_eq!(result.label, AttritionClass::Leave);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.method, PredictionMode::Fallback);
    }

    #[test]
    fn test_fallback_low_risk_profile() {
        let profile = EmployeeProfile::new()
            .with("OverTime", "Tidak")
            .with("JobSatisfaction", "Sangat Tinggi")
            .with("WorkLifeBalance", "Terbaik");
        let result = assess_fallback(&profile);
        assert!((result.p_leave() - 0.3).abs() < 1e-9);
        assert_eq!(result.label, AttritionClass::Stay);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_defaults_for_absent_fields() {
        // 0.3 + 0 + 0.3 * 0.25 + 0.2 * 0.25
        let p = FallbackPredictor::score(&NormalizedProfile::new());
        assert!((p - 0.425).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_is_clamped() {
        let worst = NormalizedProfile::new()
            .with(FeatureKey::OverTime, 5.0)
            .with(FeatureKey::JobSatisfaction, 0.0)
            .with(FeatureKey::WorkLifeBalance, 0.0);
        assert_eq!(FallbackPredictor::score(&worst), 0.95);

        let best = NormalizedProfile::new()
            .with(FeatureKey::JobSatisfaction, 40.0)
            .with(FeatureKey::WorkLifeBalance, 40.0);
        assert_eq!(FallbackPredictor::score(&best), 0.05);
    }

    fn live(classifier: Arc<dyn Classifier>) -> LivePredictor {
        let layout = ModelLayout::default_layout();
        let scaler = StandardScaler::identity(layout.len());
        LivePredictor::new(classifier, scaler, layout, RiskThresholds::default())
    }

    #[test]
    fn test_live_prediction_sums_to_one() {
        let layout = ModelLayout::default_layout();
        let mut coefficients = vec![0.0; layout.len()];
        coefficients[16] = 3.0; // OverTime_Yes
        let predictor = live(Arc::new(LogisticClassifier::new(coefficients, -1.0)));

        let normalized = normalize(&EmployeeProfile::new().with("OverTime", "Ya"));
        let vector = build(&normalized, &layout);
        let result = predictor.predict(&normalized, &vector).unwrap();

        assert_eq!(result.method, PredictionMode::Live);
        assert_eq!(result.label, AttritionClass::Leave);
        assert!((result.probabilities[0] + result.probabilities[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_live_rejects_foreign_layout() {
        let predictor = live(Arc::new(LogisticClassifier::new(vec![0.0; 19], 0.0)));
        let other = ModelLayout::new(vec!["Age".into()]);
        let vector = build(&NormalizedProfile::new(), &other);
        let err = predictor.predict(&NormalizedProfile::new(), &vector).unwrap_err();
        assert!(matches!(err, InferenceError::Layout(_)));
    }

    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn name(&self) -> &str {
            "broken"
        }
        fn input_dim(&self) -> Option<usize> {
            None
        }
        fn predict_proba(&self, rows: ArrayView2<f64>) -> Result<Vec<[f64; 2]>, InferenceError> {
            Ok(vec![[f64::NAN, 0.5]; rows.nrows()])
        }
    }

    #[test]
    fn test_live_rejects_nan_output() {
        let predictor = live(Arc::new(BrokenClassifier));
        let layout = ModelLayout::default_layout();
        let vector = build(&NormalizedProfile::new(), &layout);
        assert!(matches!(
            predictor.predict(&NormalizedProfile::new(), &vector),
            Err(InferenceError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_renormalize() {
        let [p0, p1] = LivePredictor::renormalize([2.0, 6.0]).unwrap();
        assert_eq!((p0, p1), (0.25, 0.75));
        assert!(LivePredictor::renormalize([0.0, 0.0]).is_err());
        assert!(LivePredictor::renormalize([-0.1, 1.1]).is_err());
    }
}
