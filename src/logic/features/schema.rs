//! Feature Schema - Static definition of every HR input field
//!
//! **This file controls the input schema**
//!
//! Every categorical domain maps a display label to a STABLE integer code.
//! The trained model was fit on these codes, so a code must never change
//! for an existing label. New labels get new codes.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::profile::{EmployeeProfile, RawValue};

// ============================================================================
// FEATURE KEYS
// ============================================================================

/// Semantic input fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKey {
    Age,
    Gender,
    MaritalStatus,
    DistanceFromHome,
    JobLevel,
    YearsAtCompany,
    YearsInCurrentRole,
    YearsSinceLastPromotion,
    OverTime,
    BusinessTravel,
    MonthlyIncome,
    PercentSalaryHike,
    StockOptionLevel,
    JobSatisfaction,
    WorkLifeBalance,
    EnvironmentSatisfaction,
    PerformanceRating,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 17] = [
        FeatureKey::Age,
        FeatureKey::Gender,
        FeatureKey::MaritalStatus,
        FeatureKey::DistanceFromHome,
        FeatureKey::JobLevel,
        FeatureKey::YearsAtCompany,
        FeatureKey::YearsInCurrentRole,
        FeatureKey::YearsSinceLastPromotion,
        FeatureKey::OverTime,
        FeatureKey::BusinessTravel,
        FeatureKey::MonthlyIncome,
        FeatureKey::PercentSalaryHike,
        FeatureKey::StockOptionLevel,
        FeatureKey::JobSatisfaction,
        FeatureKey::WorkLifeBalance,
        FeatureKey::EnvironmentSatisfaction,
        FeatureKey::PerformanceRating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Age => "Age",
            FeatureKey::Gender => "Gender",
            FeatureKey::MaritalStatus => "MaritalStatus",
            FeatureKey::DistanceFromHome => "DistanceFromHome",
            FeatureKey::JobLevel => "JobLevel",
            FeatureKey::YearsAtCompany => "YearsAtCompany",
            FeatureKey::YearsInCurrentRole => "YearsInCurrentRole",
            FeatureKey::YearsSinceLastPromotion => "YearsSinceLastPromotion",
            FeatureKey::OverTime => "OverTime",
            FeatureKey::BusinessTravel => "BusinessTravel",
            FeatureKey::MonthlyIncome => "MonthlyIncome",
            FeatureKey::PercentSalaryHike => "PercentSalaryHike",
            FeatureKey::StockOptionLevel => "StockOptionLevel",
            FeatureKey::JobSatisfaction => "JobSatisfaction",
            FeatureKey::WorkLifeBalance => "WorkLifeBalance",
            FeatureKey::EnvironmentSatisfaction => "EnvironmentSatisfaction",
            FeatureKey::PerformanceRating => "PerformanceRating",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for a field name outside the schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature key: {0}")]
pub struct UnknownFeatureKey(pub String);

impl FromStr for FeatureKey {
    type Err = UnknownFeatureKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFeatureKey(s.to_string()))
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    OrdinalCategorical,
    NominalCategorical,
}

impl FeatureKind {
    pub fn is_categorical(&self) -> bool {
        !matches!(self, FeatureKind::Numeric)
    }
}

/// Value domain of a field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureDomain {
    Range { min: f64, max: f64, unit: &'static str },
    Labels(&'static [(&'static str, i64)]),
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureDefinition {
    pub key: FeatureKey,
    pub kind: FeatureKind,
    pub domain: FeatureDomain,
    pub default: RawValue,
    pub label: &'static str,
    pub explanation: &'static str,
}

impl FeatureDefinition {
    /// Resolve a display label to its code. `None` when the label is unknown
    /// or the field is numeric.
    pub fn code_for(&self, label: &str) -> Option<i64> {
        match &self.domain {
            FeatureDomain::Labels(options) => options
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, code)| *code),
            FeatureDomain::Range { .. } => None,
        }
    }

    /// Reverse lookup: code -> display label
    pub fn label_for(&self, code: i64) -> Option<&'static str> {
        match &self.domain {
            FeatureDomain::Labels(options) => options
                .iter()
                .find(|(_, c)| *c == code)
                .map(|(label, _)| *label),
            FeatureDomain::Range { .. } => None,
        }
    }

    /// All valid codes (categorical) in display order
    pub fn codes(&self) -> Vec<i64> {
        match &self.domain {
            FeatureDomain::Labels(options) => options.iter().map(|(_, c)| *c).collect(),
            FeatureDomain::Range { .. } => Vec::new(),
        }
    }
}

// ============================================================================
// DOMAINS
// ============================================================================

const GENDER: &[(&str, i64)] = &[("Perempuan", 0), ("Laki-laki", 1)];
const MARITAL_STATUS: &[(&str, i64)] = &[("Lajang", 0), ("Menikah", 1), ("Bercerai", 2)];
const JOB_LEVEL: &[(&str, i64)] = &[
    ("Pemula", 1),
    ("Junior", 2),
    ("Menengah", 3),
    ("Senior", 4),
    ("Eksekutif", 5),
];
const OVER_TIME: &[(&str, i64)] = &[("Tidak", 0), ("Ya", 1)];
const BUSINESS_TRAVEL: &[(&str, i64)] = &[("Tidak Pernah", 0), ("Jarang", 1), ("Sering", 2)];
const STOCK_OPTION_LEVEL: &[(&str, i64)] = &[
    ("Tidak Ada", 0),
    ("Dasar", 1),
    ("Standar", 2),
    ("Premium", 3),
];
const SATISFACTION: &[(&str, i64)] = &[
    ("Rendah", 1),
    ("Sedang", 2),
    ("Tinggi", 3),
    ("Sangat Tinggi", 4),
];
const WORK_LIFE_BALANCE: &[(&str, i64)] = &[
    ("Buruk", 1),
    ("Baik", 2),
    ("Lebih Baik", 3),
    ("Terbaik", 4),
];
const PERFORMANCE_RATING: &[(&str, i64)] = &[
    ("Rendah", 1),
    ("Baik", 2),
    ("Sangat Baik", 3),
    ("Luar Biasa", 4),
];

fn numeric(
    key: FeatureKey,
    min: f64,
    max: f64,
    default: f64,
    unit: &'static str,
    label: &'static str,
    explanation: &'static str,
) -> FeatureDefinition {
    FeatureDefinition {
        key,
        kind: FeatureKind::Numeric,
        domain: FeatureDomain::Range { min, max, unit },
        default: RawValue::Number(default),
        label,
        explanation,
    }
}

fn categorical(
    key: FeatureKey,
    kind: FeatureKind,
    options: &'static [(&'static str, i64)],
    default: &'static str,
    label: &'static str,
    explanation: &'static str,
) -> FeatureDefinition {
    FeatureDefinition {
        key,
        kind,
        domain: FeatureDomain::Labels(options),
        default: RawValue::Label(default.to_string()),
        label,
        explanation,
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Immutable schema shared by every request
pub struct FeatureSchema {
    definitions: Vec<FeatureDefinition>,
}

static SCHEMA: Lazy<FeatureSchema> = Lazy::new(FeatureSchema::build);

impl FeatureSchema {
    /// Process-wide schema instance
    pub fn global() -> &'static FeatureSchema {
        &SCHEMA
    }

    fn build() -> Self {
        use FeatureKind::{NominalCategorical, OrdinalCategorical};

        let definitions = vec![
            numeric(FeatureKey::Age, 18.0, 65.0, 32.0, "tahun", "Umur Karyawan",
                "Usia karyawan dalam tahun. Karyawan yang lebih muda (20-30) dan mendekati pensiun (55+) memiliki risiko attrisi lebih tinggi."),
            categorical(FeatureKey::Gender, NominalCategorical, GENDER, "Laki-laki", "Jenis Kelamin",
                "Jenis kelamin karyawan. Membantu menganalisis pola attrisi berdasarkan gender untuk strategi retensi yang tepat."),
            categorical(FeatureKey::MaritalStatus, NominalCategorical, MARITAL_STATUS, "Menikah", "Status Pernikahan",
                "Status pernikahan karyawan. Karyawan lajang cenderung lebih mobile, sedangkan yang menikah lebih stabil."),
            numeric(FeatureKey::DistanceFromHome, 1.0, 50.0, 7.0, "km", "Jarak dari Rumah",
                "Jarak tempat tinggal ke kantor dalam kilometer. Jarak >20km meningkatkan risiko attrisi karena biaya dan waktu perjalanan."),
            categorical(FeatureKey::JobLevel, OrdinalCategorical, JOB_LEVEL, "Menengah", "Level Pekerjaan",
                "Tingkat senioritas dalam organisasi. Level pemula dan menengah memiliki risiko attrisi lebih tinggi karena mencari pertumbuhan karir."),
            numeric(FeatureKey::YearsAtCompany, 0.0, 40.0, 5.0, "tahun", "Lama Bekerja di Perusahaan",
                "Total masa kerja di perusahaan. Karyawan dengan masa kerja 1-3 tahun paling berisiko karena masih beradaptasi."),
            numeric(FeatureKey::YearsInCurrentRole, 0.0, 20.0, 2.0, "tahun", "Lama di Posisi Saat Ini",
                "Berapa lama karyawan berada di posisi/role yang sama. Terlalu lama di posisi yang sama dapat menyebabkan kebosanan."),
            numeric(FeatureKey::YearsSinceLastPromotion, 0.0, 20.0, 1.0, "tahun", "Tahun Sejak Promosi Terakhir",
                "Waktu sejak promosi terakhir. Tidak ada promosi >3 tahun dapat menurunkan motivasi dan meningkatkan risiko attrisi."),
            categorical(FeatureKey::OverTime, NominalCategorical, OVER_TIME, "Tidak", "Kerja Lembur",
                "Apakah karyawan sering bekerja lembur. Lembur berlebihan adalah faktor risiko utama yang meningkatkan burnout."),
            categorical(FeatureKey::BusinessTravel, NominalCategorical, BUSINESS_TRAVEL, "Jarang", "Perjalanan Dinas",
                "Frekuensi perjalanan dinas. Perjalanan yang terlalu sering dapat mengganggu work-life balance."),
            numeric(FeatureKey::MonthlyIncome, 1000.0, 25000.0, 5000.0, "USD", "Gaji Bulanan (USD)",
                "Gaji bulanan dalam USD. Gaji yang tidak kompetitif dibanding pasar adalah faktor risiko attrisi yang signifikan."),
            numeric(FeatureKey::PercentSalaryHike, 0.0, 25.0, 13.0, "%", "Persentase Kenaikan Gaji Terakhir",
                "Persentase kenaikan gaji tahun lalu. Kenaikan <10% atau tidak ada kenaikan meningkatkan risiko attrisi."),
            categorical(FeatureKey::StockOptionLevel, OrdinalCategorical, STOCK_OPTION_LEVEL, "Dasar", "Level Opsi Saham",
                "Tingkat kepemilikan saham perusahaan. Opsi saham dapat meningkatkan loyalitas dan retensi karyawan jangka panjang."),
            categorical(FeatureKey::JobSatisfaction, OrdinalCategorical, SATISFACTION, "Tinggi", "Kepuasan Kerja",
                "Tingkat kepuasan dengan pekerjaan saat ini. Kepuasan rendah adalah prediktor terkuat untuk attrisi."),
            categorical(FeatureKey::WorkLifeBalance, OrdinalCategorical, WORK_LIFE_BALANCE, "Lebih Baik", "Keseimbangan Kerja-Hidup",
                "Seberapa baik karyawan dapat menyeimbangkan pekerjaan dan kehidupan pribadi. Work-life balance buruk meningkatkan risiko burnout."),
            categorical(FeatureKey::EnvironmentSatisfaction, OrdinalCategorical, SATISFACTION, "Tinggi", "Kepuasan Lingkungan Kerja",
                "Kepuasan dengan lingkungan kerja, rekan kerja, dan budaya perusahaan. Lingkungan yang toxic meningkatkan turnover."),
            categorical(FeatureKey::PerformanceRating, OrdinalCategorical, PERFORMANCE_RATING, "Sangat Baik", "Rating Kinerja",
                "Penilaian kinerja terbaru. High performer yang tidak dihargai atau low performer yang merasa tertekan sama-sama berisiko tinggi."),
        ];

        debug_assert_eq!(definitions.len(), FeatureKey::ALL.len());
        debug_assert!(definitions.iter().zip(FeatureKey::ALL.iter()).all(|(d, k)| d.key == *k));

        Self { definitions }
    }

    /// Definition of a field. Total over `FeatureKey`.
    pub fn describe(&self, key: FeatureKey) -> &FeatureDefinition {
        // definitions are stored in FeatureKey::ALL order
        &self.definitions[key as usize]
    }

    /// String lookup for untrusted input
    pub fn lookup(&self, name: &str) -> Option<&FeatureDefinition> {
        name.parse::<FeatureKey>().ok().map(|key| self.describe(key))
    }

    pub fn all_keys(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        self.definitions.iter().map(|d| d.key)
    }

    pub fn definitions(&self) -> &[FeatureDefinition] {
        &self.definitions
    }

    /// Profile with every field at its declared default
    pub fn default_profile(&self) -> EmployeeProfile {
        let mut profile = EmployeeProfile::new();
        for definition in &self.definitions {
            profile.insert(definition.key.as_str(), definition.default.clone());
        }
        profile
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_all_keys() {
        let schema = FeatureSchema::global();
        assert_eq!(schema.all_keys().count(), 17);
        for key in FeatureKey::ALL {
            assert_eq!(schema.describe(key).key, key);
        }
    }

    #[test]
    fn test_key_round_trip_through_str() {
        for key in FeatureKey::ALL {
            assert_eq!(key.as_str().parse::<FeatureKey>(), Ok(key));
        }
        assert!("JobRole".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn test_codes_are_stable() {
        let schema = FeatureSchema::global();
        let marital = schema.describe(FeatureKey::MaritalStatus);
        assert_eq!(marital.code_for("Lajang"), Some(0));
        assert_eq!(marital.code_for("Menikah"), Some(1));
        assert_eq!(marital.code_for("Bercerai"), Some(2));
        assert_eq!(marital.code_for("Menikah"), marital.code_for("Menikah"));
        assert_eq!(marital.code_for("unknown"), None);

        let job_level = schema.describe(FeatureKey::JobLevel);
        assert_eq!(job_level.label_for(5), Some("Eksekutif"));
        assert_eq!(job_level.label_for(9), None);
    }

    #[test]
    fn test_categorical_defaults_are_in_domain() {
        let schema = FeatureSchema::global();
        for definition in schema.definitions() {
            match (&definition.domain, &definition.default) {
                (FeatureDomain::Labels(_), RawValue::Label(label)) => {
                    assert!(definition.code_for(label).is_some(), "{} default", definition.key);
                }
                (FeatureDomain::Range { min, max, .. }, RawValue::Number(value)) => {
                    assert!(value >= min && value <= max, "{} default", definition.key);
                }
                _ => panic!("{} default does not match its domain", definition.key),
            }
        }
    }

    #[test]
    fn test_kinds() {
        let schema = FeatureSchema::global();
        assert_eq!(schema.describe(FeatureKey::Age).kind, FeatureKind::Numeric);
        assert_eq!(schema.describe(FeatureKey::Gender).kind, FeatureKind::NominalCategorical);
        assert_eq!(schema.describe(FeatureKey::JobSatisfaction).kind, FeatureKind::OrdinalCategorical);
        assert!(schema.lookup("OverTime").is_some());
        assert!(schema.lookup("Department").is_none());
    }

    #[test]
    fn test_default_profile_has_every_field() {
        let profile = FeatureSchema::global().default_profile();
        assert_eq!(profile.len(), 17);
        assert_eq!(profile.get("OverTime"), Some(&RawValue::Label("Tidak".to_string())));
    }
}
