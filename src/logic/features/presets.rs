//! Quick Profiles - hard-coded employee profiles used instead of manual entry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::EmployeeProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickProfile {
    HighPerformer,
    Average,
    FreshGraduate,
    AtRisk,
}

/// Serializable summary for listing presets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub id: QuickProfile,
    pub title: String,
    pub description: String,
}

impl QuickProfile {
    pub const ALL: [QuickProfile; 4] = [
        QuickProfile::HighPerformer,
        QuickProfile::Average,
        QuickProfile::FreshGraduate,
        QuickProfile::AtRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickProfile::HighPerformer => "high-performer",
            QuickProfile::Average => "average",
            QuickProfile::FreshGraduate => "fresh-graduate",
            QuickProfile::AtRisk => "at-risk",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuickProfile::HighPerformer => "Karyawan Berprestasi",
            QuickProfile::Average => "Karyawan Biasa",
            QuickProfile::FreshGraduate => "Fresh Graduate",
            QuickProfile::AtRisk => "Karyawan Berisiko",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QuickProfile::HighPerformer => "High performer dengan kompensasi tinggi dan kepuasan kerja yang baik",
            QuickProfile::Average => "Karyawan dengan performa rata-rata dan kondisi kerja yang stabil",
            QuickProfile::FreshGraduate => "Karyawan baru lulusan dengan adaptasi awal dan gaji entry level",
            QuickProfile::AtRisk => "Karyawan dengan multiple red flags: lembur, kepuasan rendah, no promotion",
        }
    }

    pub fn info(&self) -> PresetInfo {
        PresetInfo {
            id: *self,
            title: self.title().to_string(),
            description: self.description().to_string(),
        }
    }

    pub fn profile(&self) -> EmployeeProfile {
        match self {
            QuickProfile::HighPerformer => EmployeeProfile::new()
                .with("Age", 35.0)
                .with("Gender", "Laki-laki")
                .with("MaritalStatus", "Menikah")
                .with("DistanceFromHome", 5.0)
                .with("JobLevel", "Senior")
                .with("YearsAtCompany", 8.0)
                .with("YearsInCurrentRole", 3.0)
                .with("YearsSinceLastPromotion", 1.0)
                .with("OverTime", "Tidak")
                .with("BusinessTravel", "Jarang")
                .with("MonthlyIncome", 8000.0)
                .with("PercentSalaryHike", 18.0)
                .with("StockOptionLevel", "Premium")
                .with("JobSatisfaction", "Sangat Tinggi")
                .with("WorkLifeBalance", "Lebih Baik")
                .with("EnvironmentSatisfaction", "Sangat Tinggi")
                .with("PerformanceRating", "Luar Biasa"),
            QuickProfile::Average => EmployeeProfile::new()
                .with("Age", 32.0)
                .with("Gender", "Perempuan")
                .with("MaritalStatus", "Menikah")
                .with("DistanceFromHome", 7.0)
                .with("JobLevel", "Menengah")
                .with("YearsAtCompany", 5.0)
                .with("YearsInCurrentRole", 2.0)
                .with("YearsSinceLastPromotion", 2.0)
                .with("OverTime", "Tidak")
                .with("BusinessTravel", "Jarang")
                .with("MonthlyIncome", 5000.0)
                .with("PercentSalaryHike", 13.0)
                .with("StockOptionLevel", "Dasar")
                .with("JobSatisfaction", "Tinggi")
                .with("WorkLifeBalance", "Lebih Baik")
                .with("EnvironmentSatisfaction", "Tinggi")
                .with("PerformanceRating", "Sangat Baik"),
            QuickProfile::FreshGraduate => EmployeeProfile::new()
                .with("Age", 24.0)
                .with("Gender", "Laki-laki")
                .with("MaritalStatus", "Lajang")
                .with("DistanceFromHome", 15.0)
                .with("JobLevel", "Pemula")
                .with("YearsAtCompany", 1.0)
                .with("YearsInCurrentRole", 1.0)
                .with("YearsSinceLastPromotion", 0.0)
                .with("OverTime", "Ya")
                .with("BusinessTravel", "Tidak Pernah")
                .with("MonthlyIncome", 3000.0)
                .with("PercentSalaryHike", 11.0)
                .with("StockOptionLevel", "Tidak Ada")
                .with("JobSatisfaction", "Tinggi")
                .with("WorkLifeBalance", "Baik")
                .with("EnvironmentSatisfaction", "Tinggi")
                .with("PerformanceRating", "Baik"),
            QuickProfile::AtRisk => EmployeeProfile::new()
                .with("Age", 28.0)
                .with("Gender", "Perempuan")
                .with("MaritalStatus", "Lajang")
                .with("DistanceFromHome", 25.0)
                .with("JobLevel", "Junior")
                .with("YearsAtCompany", 3.0)
                .with("YearsInCurrentRole", 3.0)
                .with("YearsSinceLastPromotion", 3.0)
                .with("OverTime", "Ya")
                .with("BusinessTravel", "Sering")
                .with("MonthlyIncome", 3500.0)
                .with("PercentSalaryHike", 11.0)
                .with("StockOptionLevel", "Tidak Ada")
                .with("JobSatisfaction", "Rendah")
                .with("WorkLifeBalance", "Buruk")
                .with("EnvironmentSatisfaction", "Rendah")
                .with("PerformanceRating", "Baik"),
        }
    }
}

impl fmt::Display for QuickProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quick profile: {0}")]
pub struct UnknownPreset(pub String);

impl FromStr for QuickProfile {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickProfile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
