//! Rule-based Risk Factors
//!
//! Independent threshold checks on the normalized profile, reported next to
//! the model prediction. They never depend on the model being available.

use serde::{Deserialize, Serialize};

use super::features::{FeatureKey, NormalizedProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFactorCode {
    Overtime,
    LowJobSatisfaction,
    PoorWorkLifeBalance,
    NoPromotion,
    Distance,
    LowHike,
    FrequentTravel,
    LowEnvironmentSatisfaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub code: RiskFactorCode,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

/// One threshold rule: (field, value used when absent, predicate)
struct Rule {
    code: RiskFactorCode,
    key: FeatureKey,
    absent: f64,
    triggered: fn(f64) -> bool,
    severity: Severity,
    title: &'static str,
    detail: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        code: RiskFactorCode::Overtime,
        key: FeatureKey::OverTime,
        absent: 0.0,
        triggered: |v| v == 1.0,
        severity: Severity::High,
        title: "Sering Lembur",
        detail: "Indikasi workload berlebihan atau work-life balance buruk",
    },
    Rule {
        code: RiskFactorCode::LowJobSatisfaction,
        key: FeatureKey::JobSatisfaction,
        absent: 4.0,
        triggered: |v| v <= 2.0,
        severity: Severity::High,
        title: "Kepuasan Kerja Rendah",
        detail: "Faktor risiko utama untuk attrisi",
    },
    Rule {
        code: RiskFactorCode::PoorWorkLifeBalance,
        key: FeatureKey::WorkLifeBalance,
        absent: 4.0,
        triggered: |v| v <= 2.0,
        severity: Severity::High,
        title: "Work-Life Balance Buruk",
        detail: "Dapat menyebabkan burnout",
    },
    Rule {
        code: RiskFactorCode::NoPromotion,
        key: FeatureKey::YearsSinceLastPromotion,
        absent: 0.0,
        triggered: |v| v >= 3.0,
        severity: Severity::Medium,
        title: "Tidak Ada Promosi 3+ Tahun",
        detail: "Potensi stagnasi karir",
    },
    Rule {
        code: RiskFactorCode::Distance,
        key: FeatureKey::DistanceFromHome,
        absent: 0.0,
        triggered: |v| v > 20.0,
        severity: Severity::Medium,
        title: "Jarak Rumah Jauh",
        detail: "Biaya dan waktu komute tinggi",
    },
    Rule {
        code: RiskFactorCode::LowHike,
        key: FeatureKey::PercentSalaryHike,
        absent: 13.0,
        triggered: |v| v < 10.0,
        severity: Severity::Medium,
        title: "Kenaikan Gaji Rendah",
        detail: "Gaji tidak kompetitif",
    },
    Rule {
        code: RiskFactorCode::FrequentTravel,
        key: FeatureKey::BusinessTravel,
        absent: 1.0,
        triggered: |v| v == 2.0,
        severity: Severity::Medium,
        title: "Sering Perjalanan Dinas",
        detail: "Dapat mengganggu kehidupan pribadi",
    },
    Rule {
        code: RiskFactorCode::LowEnvironmentSatisfaction,
        key: FeatureKey::EnvironmentSatisfaction,
        absent: 4.0,
        triggered: |v| v <= 2.0,
        severity: Severity::Medium,
        title: "Kepuasan Lingkungan Kerja Rendah",
        detail: "Budaya atau lingkungan tidak mendukung",
    },
];

/// Every triggered rule, in rule order
pub fn evaluate(normalized: &NormalizedProfile) -> Vec<RiskFactor> {
    RULES
        .iter()
        .filter(|rule| (rule.triggered)(normalized.get_or(rule.key, rule.absent)))
        .map(|rule| RiskFactor {
            code: rule.code,
            severity: rule.severity,
            title: rule.title.to_string(),
            detail: rule.detail.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{normalize, EmployeeProfile, FeatureSchema};

    fn codes(normalized: &NormalizedProfile) -> Vec<RiskFactorCode> {
        evaluate(normalized).into_iter().map(|f| f.code).collect()
    }

    #[test]
    fn test_empty_profile_has_no_factors() {
        assert!(evaluate(&NormalizedProfile::new()).is_empty());
    }

    #[test]
    fn test_long_commute_stale_promotion_low_hike() {
        let profile = FeatureSchema::global()
            .default_profile()
            .with("DistanceFromHome", 25.0)
            .with("YearsSinceLastPromotion", 3.0)
            .with("PercentSalaryHike", 8.0);
        assert_eq!(
            codes(&normalize(&profile)),
            vec![RiskFactorCode::NoPromotion, RiskFactorCode::Distance, RiskFactorCode::LowHike]
        );
    }

    #[test]
    fn test_high_severity_factors() {
        let profile = EmployeeProfile::new()
            .with("OverTime", "Ya")
            .with("JobSatisfaction", "Sedang")
            .with("WorkLifeBalance", "Baik");
        let factors = evaluate(&normalize(&profile));
        assert_eq!(factors.len(), 3);
        assert!(factors.iter().all(|f| f.severity == Severity::High));
    }

    #[test]
    fn test_boundaries() {
        let at_limits = NormalizedProfile::new()
            .with(FeatureKey::DistanceFromHome, 20.0)
            .with(FeatureKey::PercentSalaryHike, 10.0)
            .with(FeatureKey::YearsSinceLastPromotion, 2.0)
            .with(FeatureKey::JobSatisfaction, 3.0)
            .with(FeatureKey::BusinessTravel, 1.0);
        assert!(evaluate(&at_limits).is_empty());

        let over = NormalizedProfile::new()
            .with(FeatureKey::BusinessTravel, 2.0)
            .with(FeatureKey::EnvironmentSatisfaction, 2.0);
        assert_eq!(
            codes(&over),
            vec![RiskFactorCode::FrequentTravel, RiskFactorCode::LowEnvironmentSatisfaction]
        );
    }

    #[test]
    fn test_at_risk_preset_triggers_everything_but_hike() {
        let profile = crate::logic::features::QuickProfile::AtRisk.profile();
        let found = codes(&normalize(&profile));
        assert_eq!(found.len(), 7);
        assert!(!found.contains(&RiskFactorCode::LowHike));
    }
}
