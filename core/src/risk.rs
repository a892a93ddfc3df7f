//! Flood risk tiers derived from the river level.
//!
//! The tier is always computed on the client from the normalized level.
//! Payloads that carry their own risk field are ignored on that point so the
//! tier shown for a given level never depends on which backend answered.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Levels below this are `Low`.
pub const MEDIUM_THRESHOLD_M: f64 = 2.0;
/// Levels below this (and at or above `MEDIUM_THRESHOLD_M`) are `Medium`.
pub const HIGH_THRESHOLD_M: f64 = 2.5;
/// Levels at or above this are `Critical`.
pub const CRITICAL_THRESHOLD_M: f64 = 3.0;

/// Discretized flood severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "baixo")]
    Low,
    #[serde(alias = "medio")]
    Medium,
    #[serde(alias = "alto")]
    High,
    #[serde(alias = "critico")]
    Critical,
}

impl RiskLevel {
    /// Classify a river level in meters.
    ///
    /// NaN compares false against every threshold and therefore lands in
    /// `Critical`, the conservative side.
    pub fn from_level(level_m: f64) -> Self {
        if level_m < MEDIUM_THRESHOLD_M {
            RiskLevel::Low
        } else if level_m < HIGH_THRESHOLD_M {
            RiskLevel::Medium
        } else if level_m < CRITICAL_THRESHOLD_M {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Operator-facing status for the level gauge.
    pub fn status_label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Normal",
            RiskLevel::Medium => "Attention",
            RiskLevel::High => "Alert",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "System operating within normal parameters",
            RiskLevel::Medium => "Continuous monitoring required",
            RiskLevel::High => "Adverse conditions detected",
            RiskLevel::Critical => "Emergency situation in progress",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(RiskLevel::from_level(1.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_level(2.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_level(2.49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_level(2.5), RiskLevel::High);
        assert_eq!(RiskLevel::from_level(2.99), RiskLevel::High);
        assert_eq!(RiskLevel::from_level(3.0), RiskLevel::Critical);
    }

    #[test]
    fn extremes() {
        assert_eq!(RiskLevel::from_level(-1.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_level(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_level(42.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_level(f64::NAN), RiskLevel::Critical);
    }

    #[test]
    fn accepts_portuguese_tags() {
        let r: RiskLevel = serde_json::from_str(r#""medio""#).unwrap();
        assert_eq!(r, RiskLevel::Medium);
        let r: RiskLevel = serde_json::from_str(r#""critical""#).unwrap();
        assert_eq!(r, RiskLevel::Critical);
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), r#""high""#);
    }

    #[test]
    fn tiers_are_ordered_by_severity() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }
}
