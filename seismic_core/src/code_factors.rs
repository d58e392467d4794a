//! # Code Factors
//!
//! Site hazard and occupancy categories that map to fixed code values.
//!
//! | Category | Values |
//! |----------|--------|
//! | Risk level → design acceleration ratio A | Low 0.20, Medium 0.25, High 0.30, Very high 0.35 |
//! | Importance category → importance factor I | Low 0.8, Medium 1.0, High 1.2, Very high 1.4 |
//!
//! Also holds the small enums that name the two orthogonal axes, the two
//! design levels and the period mode.

use serde::{Deserialize, Serialize};

use crate::errors::{SeismicError, SeismicResult};

/// Seismic hazard category of the site.
///
/// Ordered from low to very high. Each level maps to a fixed design
/// acceleration ratio A (fraction of g).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// A = 0.20
    Low,
    /// A = 0.25
    Medium,
    /// A = 0.30
    High,
    /// A = 0.35
    VeryHigh,
}

impl RiskLevel {
    /// All risk levels for UI selection, low to very high
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    /// Design acceleration ratio A
    pub fn acceleration_ratio(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.20,
            RiskLevel::Medium => 0.25,
            RiskLevel::High => 0.30,
            RiskLevel::VeryHigh => 0.35,
        }
    }

    /// High or very high
    pub fn is_upper_band(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::VeryHigh)
    }

    /// Low or medium
    pub fn is_lower_band(&self) -> bool {
        matches!(self, RiskLevel::Low | RiskLevel::Medium)
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> SeismicResult<Self> {
        match s.to_uppercase().replace([' ', '_', '-'], "").as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" | "MODERATE" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            "VERYHIGH" => Ok(RiskLevel::VeryHigh),
            _ => Err(SeismicError::unknown_risk_level(s)),
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Occupancy importance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImportanceCategory {
    /// Low-occupancy buildings: I = 0.8
    Low,
    /// Ordinary buildings: I = 1.0
    Medium,
    /// Important buildings: I = 1.2
    High,
    /// Essential facilities: I = 1.4
    VeryHigh,
}

impl ImportanceCategory {
    /// All categories for UI selection
    pub const ALL: [ImportanceCategory; 4] = [
        ImportanceCategory::Low,
        ImportanceCategory::Medium,
        ImportanceCategory::High,
        ImportanceCategory::VeryHigh,
    ];

    /// Baseline importance factor used by the eligibility rules
    pub const BASELINE: f64 = 1.0;

    /// Importance factor I
    pub fn factor(&self) -> f64 {
        match self {
            ImportanceCategory::Low => 0.8,
            ImportanceCategory::Medium => 1.0,
            ImportanceCategory::High => 1.2,
            ImportanceCategory::VeryHigh => 1.4,
        }
    }

    /// Resolve a numeric importance factor to its category.
    ///
    /// Only the four code values are accepted.
    pub fn from_factor(factor: f64) -> SeismicResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| (c.factor() - factor).abs() < 1e-9)
            .ok_or_else(|| SeismicError::unknown_importance_factor(factor.to_string()))
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ImportanceCategory::Low => "Low (0.8)",
            ImportanceCategory::Medium => "Medium (1.0)",
            ImportanceCategory::High => "High (1.2)",
            ImportanceCategory::VeryHigh => "Very high (1.4)",
        }
    }
}

impl std::fmt::Display for ImportanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One of the two orthogonal lateral-resisting directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axes in evaluation order (X before Y)
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Computation track.
///
/// The strength level designs the base shear from the bounded design
/// period; the drift level checks story drift from the raw analytical
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignLevel {
    Strength,
    Drift,
}

impl DesignLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            DesignLevel::Strength => "Strength",
            DesignLevel::Drift => "Drift",
        }
    }
}

impl std::fmt::Display for DesignLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which period input feeds the strength-level design period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodMode {
    /// Analytical periods are bounded to [T_emp, 1.25·T_emp]
    #[default]
    Analytical,
    /// Analytical periods are ignored for strength; T_design = T_emp
    Empirical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceleration_ratios() {
        let ratios: Vec<f64> = RiskLevel::ALL.iter().map(|r| r.acceleration_ratio()).collect();
        assert_eq!(ratios, vec![0.20, 0.25, 0.30, 0.35]);
    }

    #[test]
    fn test_risk_bands() {
        assert!(RiskLevel::Low.is_lower_band());
        assert!(RiskLevel::Medium.is_lower_band());
        assert!(RiskLevel::High.is_upper_band());
        assert!(RiskLevel::VeryHigh.is_upper_band());
        assert!(!RiskLevel::Medium.is_upper_band());
    }

    #[test]
    fn test_risk_parsing() {
        assert_eq!(RiskLevel::from_str_flexible("very high").unwrap(), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_str_flexible("Very-High").unwrap(), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_str_flexible("LOW").unwrap(), RiskLevel::Low);
        let err = RiskLevel::from_str_flexible("extreme").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_RISK_LEVEL");
    }

    #[test]
    fn test_importance_from_factor() {
        assert_eq!(ImportanceCategory::from_factor(1.4).unwrap(), ImportanceCategory::VeryHigh);
        assert_eq!(ImportanceCategory::from_factor(1.0).unwrap(), ImportanceCategory::Medium);
        assert!(ImportanceCategory::from_factor(1.3).is_err());
    }

    #[test]
    fn test_axis_order() {
        assert_eq!(Axis::ALL, [Axis::X, Axis::Y]);
        assert_eq!(Axis::Y.to_string(), "Y");
    }
}
