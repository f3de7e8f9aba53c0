//! Model Layout - ordered column list of the trained model
//!
//! **CRITICAL: column order is fixed by the model's feature-name list**
//!
//! ## Rules (NEVER break these):
//! 1. Column order comes from the layout, never from profile iteration order
//! 2. Vectors carry the layout hash; consumers reject foreign hashes
//! 3. Change the default layout → increment LAYOUT_VERSION

use std::fmt;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current layout version. MUST be incremented when the default layout changes.
pub const LAYOUT_VERSION: u8 = 1;

// ============================================================================
// KNOWN MODEL COLUMNS
// ============================================================================

/// Every model column name this pipeline knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelColumn {
    // === Direct columns (copied from the normalized profile) ===
    Age,
    MonthlyIncome,
    YearsAtCompany,
    YearsInCurrentRole,
    YearsSinceLastPromotion,
    DistanceFromHome,
    PercentSalaryHike,
    JobLevel,
    StockOptionLevel,
    JobSatisfaction,
    WorkLifeBalance,
    EnvironmentSatisfaction,
    PerformanceRating,

    // === One-hot indicator columns ===
    GenderMale,
    MaritalStatusMarried,
    MaritalStatusSingle,
    OverTimeYes,
    BusinessTravelFrequently,
    BusinessTravelRarely,

    // === Columns without a semantic source (always zero-filled) ===
    JobInvolvement,
    RelationshipSatisfaction,
    TotalWorkingYears,
    NumCompaniesWorked,
}

impl ModelColumn {
    pub const ALL: [ModelColumn; 23] = [
        ModelColumn::Age,
        ModelColumn::MonthlyIncome,
        ModelColumn::YearsAtCompany,
        ModelColumn::YearsInCurrentRole,
        ModelColumn::YearsSinceLastPromotion,
        ModelColumn::DistanceFromHome,
        ModelColumn::PercentSalaryHike,
        ModelColumn::JobLevel,
        ModelColumn::StockOptionLevel,
        ModelColumn::JobSatisfaction,
        ModelColumn::WorkLifeBalance,
        ModelColumn::EnvironmentSatisfaction,
        ModelColumn::PerformanceRating,
        ModelColumn::GenderMale,
        ModelColumn::MaritalStatusMarried,
        ModelColumn::MaritalStatusSingle,
        ModelColumn::OverTimeYes,
        ModelColumn::BusinessTravelFrequently,
        ModelColumn::BusinessTravelRarely,
        ModelColumn::JobInvolvement,
        ModelColumn::RelationshipSatisfaction,
        ModelColumn::TotalWorkingYears,
        ModelColumn::NumCompaniesWorked,
    ];

    /// Exact column name as exported by training
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelColumn::Age => "Age",
            ModelColumn::MonthlyIncome => "MonthlyIncome",
            ModelColumn::YearsAtCompany => "YearsAtCompany",
            ModelColumn::YearsInCurrentRole => "YearsInCurrentRole",
            ModelColumn::YearsSinceLastPromotion => "YearsSinceLastPromotion",
            ModelColumn::DistanceFromHome => "DistanceFromHome",
            ModelColumn::PercentSalaryHike => "PercentSalaryHike",
            ModelColumn::JobLevel => "JobLevel",
            ModelColumn::StockOptionLevel => "StockOptionLevel",
            ModelColumn::JobSatisfaction => "JobSatisfaction",
            ModelColumn::WorkLifeBalance => "WorkLifeBalance",
            ModelColumn::EnvironmentSatisfaction => "EnvironmentSatisfaction",
            ModelColumn::PerformanceRating => "PerformanceRating",
            ModelColumn::GenderMale => "Gender_Male",
            ModelColumn::MaritalStatusMarried => "MaritalStatus_Married",
            ModelColumn::MaritalStatusSingle => "MaritalStatus_Single",
            ModelColumn::OverTimeYes => "OverTime_Yes",
            ModelColumn::BusinessTravelFrequently => "BusinessTravel_Travel_Frequently",
            ModelColumn::BusinessTravelRarely => "BusinessTravel_Travel_Rarely",
            ModelColumn::JobInvolvement => "JobInvolvement",
            ModelColumn::RelationshipSatisfaction => "RelationshipSatisfaction",
            ModelColumn::TotalWorkingYears => "TotalWorkingYears",
            ModelColumn::NumCompaniesWorked => "NumCompaniesWorked",
        }
    }

    /// Exact-name lookup. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<ModelColumn> {
        ModelColumn::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for ModelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column list used when no feature-name artifact is available
pub const DEFAULT_MODEL_COLUMNS: &[ModelColumn] = &[
    ModelColumn::Age,
    ModelColumn::MonthlyIncome,
    ModelColumn::YearsAtCompany,
    ModelColumn::YearsInCurrentRole,
    ModelColumn::YearsSinceLastPromotion,
    ModelColumn::DistanceFromHome,
    ModelColumn::PercentSalaryHike,
    ModelColumn::JobLevel,
    ModelColumn::StockOptionLevel,
    ModelColumn::JobSatisfaction,
    ModelColumn::WorkLifeBalance,
    ModelColumn::EnvironmentSatisfaction,
    ModelColumn::PerformanceRating,
    ModelColumn::GenderMale,
    ModelColumn::MaritalStatusMarried,
    ModelColumn::MaritalStatusSingle,
    ModelColumn::OverTimeYes,
    ModelColumn::BusinessTravelFrequently,
    ModelColumn::BusinessTravelRarely,
];

// ============================================================================
// MODEL LAYOUT
// ============================================================================

/// Ordered model feature list + its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLayout {
    columns: Vec<String>,
    hash: u32,
}

impl ModelLayout {
    pub fn new(columns: Vec<String>) -> Self {
        let hash = compute_layout_hash(&columns);
        Self { columns, hash }
    }

    /// Layout used in fallback mode / when the feature-name artifact is missing
    pub fn default_layout() -> Self {
        Self::new(DEFAULT_MODEL_COLUMNS.iter().map(|c| c.as_str().to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Get column index by name (O(n) but columns are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Validate that a vector was built for this layout
    pub fn validate(&self, incoming_hash: u32, incoming_len: usize) -> Result<(), LayoutMismatchError> {
        if incoming_hash != self.hash || incoming_len != self.columns.len() {
            return Err(LayoutMismatchError {
                expected_hash: self.hash,
                expected_len: self.columns.len(),
                actual_hash: incoming_hash,
                actual_len: incoming_len,
            });
        }
        Ok(())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered column names
pub fn compute_layout_hash(columns: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[LAYOUT_VERSION]);

    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Error when a vector's layout doesn't match the model's
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model layout mismatch: expected {expected_len} columns (hash: {expected_hash:08x}), got {actual_len} (hash: {actual_hash:08x})")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub expected_len: usize,
    pub actual_hash: u32,
    pub actual_len: usize,
}

// ============================================================================
// TESTS
// ============================================================================
