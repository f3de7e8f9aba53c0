//! Risk Thresholds
//!
//! Decision threshold for the predicted class and the bands
//! that turn P(leave) into a risk level.

use serde::{Deserialize, Serialize};

/// Risk band of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Display label for the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "RISIKO RENDAH",
            RiskLevel::Medium => "RISIKO SEDANG",
            RiskLevel::High => "RISIKO TINGGI",
        }
    }
}

/// Threshold Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// P(leave) above this predicts Leave
    pub decision: f64,

    /// P(leave) above this is high risk
    pub high: f64,

    /// P(leave) above this is medium risk
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            decision: 0.5,
            high: 0.7,
            medium: 0.3,
        }
    }
}

impl RiskThresholds {
    pub fn new(decision: f64) -> Self {
        Self {
            decision,
            ..Default::default()
        }
    }

    /// Flag more employees as at risk
    pub fn high_sensitivity() -> Self {
        Self {
            decision: 0.4,
            high: 0.6,
            medium: 0.25,
        }
    }

    pub fn is_leave(&self, p_leave: f64) -> bool {
        p_leave > self.decision
    }

    pub fn risk_level(&self, p_leave: f64) -> RiskLevel {
        if p_leave > self.high {
            RiskLevel::High
        } else if p_leave > self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
