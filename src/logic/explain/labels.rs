//! Explanation labels - presentation of explainer descriptors
//!
//! Descriptors look like `"OverTime_Yes > 0.50"` or `"28.00 < Age <= 35.00"`.
//! This module pulls the base feature back out and maps it to a
//! business-facing label and insight category.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::logic::features::ModelColumn;

/// Inequality / equality operators used in descriptors
static OPERATOR_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:<=|>=|≤|≥|<|>|=)\s*").expect("valid operator regex"));

// ============================================================================
// INSIGHT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Satisfaction,
    WorkLifeBalance,
    Compensation,
    Experience,
    General,
}

impl InsightCategory {
    /// Keyword rules over the technical feature name
    pub fn for_feature(feature: &str) -> Self {
        let name = feature.to_lowercase();
        if name.contains("satisfaction") {
            InsightCategory::Satisfaction
        } else if name.contains("overtime") || name.contains("worklife") {
            InsightCategory::WorkLifeBalance
        } else if name.contains("income") || name.contains("salary") {
            InsightCategory::Compensation
        } else if name.contains("years") {
            InsightCategory::Experience
        } else {
            InsightCategory::General
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InsightCategory::Satisfaction => "Kepuasan",
            InsightCategory::WorkLifeBalance => "Work-Life Balance",
            InsightCategory::Compensation => "Kompensasi",
            InsightCategory::Experience => "Pengalaman",
            InsightCategory::General => "Umum",
        }
    }

    /// Business interpretation shown next to a feature
    pub fn insight(&self) -> Option<&'static str> {
        match self {
            InsightCategory::Satisfaction => Some("Faktor kepuasan - indikator kunci employee engagement"),
            InsightCategory::WorkLifeBalance => Some("Faktor work-life balance - risiko burnout"),
            InsightCategory::Compensation => Some("Faktor kompensasi - competitive positioning"),
            InsightCategory::Experience => Some("Faktor experience - career progression"),
            InsightCategory::General => None,
        }
    }
}

// ============================================================================
// DESCRIPTOR PARSING
// ============================================================================

fn is_numeric(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

/// Base feature name inside a descriptor.
/// `"a < X <= b"`, `"X <= a"`, `"X > b"` and `"X=1"` all yield `X`.
pub fn base_feature(descriptor: &str) -> String {
    OPERATOR_SPLIT
        .split(descriptor.trim())
        .map(str::trim)
        .find(|token| !token.is_empty() && !is_numeric(token))
        .unwrap_or_else(|| descriptor.trim())
        .to_string()
}

// ============================================================================
// BUSINESS LABELS
// ============================================================================

/// Label for a known model column
fn column_label(column: ModelColumn) -> &'static str {
    match column {
        ModelColumn::Age => "Usia Karyawan",
        ModelColumn::MonthlyIncome => "Gaji Bulanan Rendah",
        ModelColumn::YearsAtCompany => "Masa Kerja Pendek",
        ModelColumn::YearsInCurrentRole => "Lama di Posisi Saat Ini",
        ModelColumn::YearsSinceLastPromotion => "Lama Tanpa Promosi",
        ModelColumn::DistanceFromHome => "Jarak Rumah Jauh",
        ModelColumn::PercentSalaryHike => "Kenaikan Gaji Rendah",
        ModelColumn::JobLevel => "Level Pekerjaan Rendah",
        ModelColumn::StockOptionLevel => "Opsi Saham Rendah",
        ModelColumn::JobSatisfaction => "Kepuasan Kerja Rendah",
        ModelColumn::WorkLifeBalance => "Work-Life Balance Buruk",
        ModelColumn::EnvironmentSatisfaction => "Kepuasan Lingkungan Kerja Rendah",
        ModelColumn::PerformanceRating => "Rating Kinerja",
        ModelColumn::GenderMale => "Jenis Kelamin Laki-laki",
        ModelColumn::MaritalStatusMarried => "Status Menikah",
        ModelColumn::MaritalStatusSingle => "Status Lajang",
        ModelColumn::OverTimeYes => "Sering Kerja Lembur",
        ModelColumn::BusinessTravelFrequently => "Sering Perjalanan Dinas",
        ModelColumn::BusinessTravelRarely => "Jarang Perjalanan Dinas",
        ModelColumn::JobInvolvement => "Keterlibatan Kerja Rendah",
        ModelColumn::RelationshipSatisfaction => "Kepuasan Hubungan Kerja Rendah",
        ModelColumn::TotalWorkingYears => "Total Pengalaman Kerja",
        ModelColumn::NumCompaniesWorked => "Jumlah Perusahaan Sebelumnya",
    }
}

/// Cleanup for columns outside the known set (e.g. `Department_Sales`)
fn clean_name(feature: &str) -> String {
    let replaced = feature
        .replace("Department", "Dept.")
        .replace("JobRole", "Posisi")
        .replace("EducationField", "Pendidikan")
        .replace("Education", "Pendidikan")
        .replace("Field", "")
        .replace('_', " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Business-friendly label for a technical feature name
pub fn business_label(feature: &str) -> String {
    match ModelColumn::from_name(feature) {
        Some(column) => column_label(column).to_string(),
        None => clean_name(feature),
    }
}

/// Short label used in the global importance chart
pub fn dashboard_label(feature: &str) -> String {
    let short = match feature {
        "OverTime_Yes" | "OverTime" => Some("Kerja Lembur"),
        "JobSatisfaction" => Some("Kepuasan Kerja"),
        "WorkLifeBalance" => Some("Work-Life Balance"),
        "MonthlyIncome" => Some("Gaji Bulanan"),
        "YearsSinceLastPromotion" => Some("Promosi Terakhir"),
        "EnvironmentSatisfaction" => Some("Kepuasan Lingkungan"),
        "DistanceFromHome" => Some("Jarak Rumah"),
        "Age" => Some("Usia"),
        "YearsAtCompany" => Some("Masa Kerja"),
        "StockOptionLevel" => Some("Opsi Saham"),
        _ => None,
    };
    match short {
        Some(label) => label.to_string(),
        None => title_case(&clean_name(feature)),
    }
}

/// "TotalWorkingYears" -> "Total Working Years"
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.push(ch);
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_feature_forms() {
        assert_eq!(base_feature("28.00 < Age <= 35.00"), "Age");
        assert_eq!(base_feature("MonthlyIncome <= 2911.00"), "MonthlyIncome");
        assert_eq!(base_feature("OverTime_Yes > 0.50"), "OverTime_Yes");
        assert_eq!(base_feature("OverTime_Yes=1"), "OverTime_Yes");
        assert_eq!(base_feature("-1.25 < JobLevel <= 0.30"), "JobLevel");
        assert_eq!(base_feature("JobSatisfaction ≤ 2"), "JobSatisfaction");
    }

    #[test]
    fn test_business_label_known_and_fallback() {
        assert_eq!(business_label("OverTime_Yes"), "Sering Kerja Lembur");
        assert_eq!(business_label("JobSatisfaction"), "Kepuasan Kerja Rendah");
        assert_eq!(business_label("Department_Sales"), "Dept. Sales");
        assert_eq!(business_label("JobRole_Sales_Executive"), "Posisi Sales Executive");
        assert_eq!(business_label("EducationField_Marketing"), "Pendidikan Marketing");
    }

    #[test]
    fn test_dashboard_label() {
        assert_eq!(dashboard_label("OverTime_Yes"), "Kerja Lembur");
        assert_eq!(dashboard_label("TotalWorkingYears"), "Total Working Years");
        assert_eq!(dashboard_label("Department_Sales"), "Dept. Sales");
    }

    #[test]
    fn test_insight_category() {
        assert_eq!(InsightCategory::for_feature("JobSatisfaction"), InsightCategory::Satisfaction);
        assert_eq!(InsightCategory::for_feature("OverTime_Yes"), InsightCategory::WorkLifeBalance);
        assert_eq!(InsightCategory::for_feature("WorkLifeBalance"), InsightCategory::WorkLifeBalance);
        assert_eq!(InsightCategory::for_feature("MonthlyIncome"), InsightCategory::Compensation);
        assert_eq!(InsightCategory::for_feature("YearsAtCompany"), InsightCategory::Experience);
        assert_eq!(InsightCategory::for_feature("Gender_Male"), InsightCategory::General);
        assert_eq!(InsightCategory::for_feature("StockOptionLevel"), InsightCategory::General);
        assert!(InsightCategory::General.insight().is_none());
    }
}
