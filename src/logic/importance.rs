//! Global Feature Importance
//!
//! The importance artifact has exactly one accepted shape:
//! `[["OverTime_Yes", 0.234], ["JobSatisfaction", 0.187], ...]`.
//! Anything else is reported and replaced by the demo table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::explain::labels::dashboard_label;
use super::explain::InsightCategory;

/// Entries shown on the dashboard
pub const TOP_FEATURES: usize = 15;

pub const MISSING_DESCRIPTION: &str = "Deskripsi tidak tersedia";

const DEMO_IMPORTANCE: [(&str, f64); 15] = [
    ("OverTime_Yes", 0.234),
    ("JobSatisfaction", 0.187),
    ("MonthlyIncome", 0.156),
    ("Age", 0.134),
    ("WorkLifeBalance", 0.127),
    ("YearsAtCompany", 0.098),
    ("DistanceFromHome", 0.087),
    ("YearsSinceLastPromotion", 0.076),
    ("EnvironmentSatisfaction", 0.065),
    ("JobLevel", 0.054),
    ("BusinessTravel_Travel_Frequently", 0.045),
    ("PercentSalaryHike", 0.034),
    ("StockOptionLevel", 0.028),
    ("PerformanceRating", 0.021),
    ("Gender_Male", 0.012),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceSource {
    Artifact,
    Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceEntry {
    pub feature: String,
    pub label: String,
    pub score: f64,
    pub category: InsightCategory,
    pub insight: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalImportance {
    pub source: ImportanceSource,
    pub entries: Vec<ImportanceEntry>,
    pub warning: Option<String>,
}

/// Validate the artifact shape
pub fn parse_pairs(raw: &serde_json::Value) -> Result<Vec<(String, f64)>, String> {
    let pairs: Vec<(String, f64)> =
        serde_json::from_value(raw.clone()).map_err(|e| format!("expected [[name, score], ...]: {}", e))?;
    if pairs.is_empty() {
        return Err("importance list is empty".to_string());
    }
    Ok(pairs)
}

fn demo_pairs() -> Vec<(String, f64)> {
    DEMO_IMPORTANCE.iter().map(|(name, score)| (name.to_string(), *score)).collect()
}

/// Top features by score, enriched for display
pub fn global_importance(
    raw: Option<&serde_json::Value>,
    descriptions: &BTreeMap<String, String>,
) -> GlobalImportance {
    let (source, mut pairs, warning) = match raw.map(parse_pairs) {
        Some(Ok(pairs)) => (ImportanceSource::Artifact, pairs, None),
        Some(Err(reason)) => {
            log::warn!("Feature importance artifact rejected ({}), using demo data", reason);
            (
                ImportanceSource::Demo,
                demo_pairs(),
                Some(format!("Format feature importance tidak sesuai, menggunakan demo data: {}", reason)),
            )
        }
        None => (ImportanceSource::Demo, demo_pairs(), None),
    };

    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(TOP_FEATURES);

    let entries = pairs
        .into_iter()
        .map(|(feature, score)| {
            let category = InsightCategory::for_feature(&feature);
            ImportanceEntry {
                label: dashboard_label(&feature),
                description: descriptions
                    .get(&feature)
                    .cloned()
                    .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
                insight: category.insight().map(str::to_string),
                category,
                feature,
                score,
            }
        })
        .collect();

    GlobalImportance { source, entries, warning }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_artifact_uses_demo() {
        let importance = global_importance(None, &BTreeMap::new());
        assert_eq!(importance.source, ImportanceSource::Demo);
        assert_eq!(importance.entries.len(), 15);
        assert_eq!(importance.entries[0].feature, "OverTime_Yes");
        assert_eq!(importance.entries[0].label, "Kerja Lembur");
        assert!(importance.warning.is_none());
    }

    #[test]
    fn test_malformed_artifact_uses_demo_with_warning() {
        for raw in [json!({"Age": 0.3}), json!([0.1, 0.2]), json!([]), json!("Age")] {
            let importance = global_importance(Some(&raw), &BTreeMap::new());
            assert_eq!(importance.source, ImportanceSource::Demo, "{}", raw);
            assert!(importance.warning.is_some());
            assert_eq!(importance.entries.len(), 15);
        }
    }

    #[test]
    fn test_artifact_sorted_and_truncated() {
        let raw: Vec<(String, f64)> = (0..20).map(|i| (format!("F{}", i), i as f64 / 100.0)).collect();
        let importance = global_importance(Some(&json!(raw)), &BTreeMap::new());
        assert_eq!(importance.source, ImportanceSource::Artifact);
        assert_eq!(importance.entries.len(), 15);
        assert_eq!(importance.entries[0].feature, "F19");
        assert!(importance
            .entries
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_descriptions_and_insights() {
        let mut descriptions = BTreeMap::new();
        descriptions.insert("JobSatisfaction".to_string(), "Kepuasan dengan pekerjaan".to_string());
        let raw = json!([["JobSatisfaction", 0.2], ["Gender_Male", 0.1]]);
        let importance = global_importance(Some(&raw), &descriptions);

        let first = &importance.entries[0];
        assert_eq!(first.description, "Kepuasan dengan pekerjaan");
        assert_eq!(first.category, InsightCategory::Satisfaction);
        assert!(first.insight.is_some());

        let second = &importance.entries[1];
        assert_eq!(second.description, MISSING_DESCRIPTION);
        assert!(second.insight.is_none());
    }
}
