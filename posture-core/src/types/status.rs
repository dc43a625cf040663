//! Assessment status and risk level enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Recorded compliance status of one control for one system.
///
/// The absence of an assessment row is equivalent to `NotAssessed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlStatus {
    Implemented,
    #[serde(rename = "Partially Implemented")]
    PartiallyImplemented,
    #[serde(rename = "Not Implemented")]
    NotImplemented,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    #[serde(rename = "Not Assessed")]
    NotAssessed,
}

impl ControlStatus {
    /// True if this status marks an open gap (not fully implemented).
    pub fn is_gap(self) -> bool {
        matches!(self, Self::NotImplemented | Self::PartiallyImplemented)
    }

    /// True if the control has been looked at and given a weighted verdict.
    /// `NotApplicable` and `NotAssessed` carry no weight.
    pub fn is_assessed(self) -> bool {
        matches!(
            self,
            Self::Implemented | Self::PartiallyImplemented | Self::NotImplemented
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Implemented => "Implemented",
            Self::PartiallyImplemented => "Partially Implemented",
            Self::NotImplemented => "Not Implemented",
            Self::NotApplicable => "Not Applicable",
            Self::NotAssessed => "Not Assessed",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Implemented" => Ok(Self::Implemented),
            "Partially Implemented" => Ok(Self::PartiallyImplemented),
            "Not Implemented" => Ok(Self::NotImplemented),
            "Not Applicable" => Ok(Self::NotApplicable),
            "Not Assessed" => Ok(Self::NotAssessed),
            other => Err(format!("unknown control status: {other}")),
        }
    }
}

/// Risk level attached to an assessment or declared on a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Sort rank: Critical=1 sorts before Low=4.
    pub fn priority_rank(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }

    /// The higher of two risk levels.
    pub fn max(self, other: Self) -> Self {
        if other.priority_rank() < self.priority_rank() {
            other
        } else {
            self
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Critical" => Ok(Self::Critical),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_roundtrip() {
        for status in [
            ControlStatus::Implemented,
            ControlStatus::PartiallyImplemented,
            ControlStatus::NotImplemented,
            ControlStatus::NotApplicable,
            ControlStatus::NotAssessed,
        ] {
            assert_eq!(status.to_string().parse::<ControlStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_risk_max_prefers_higher() {
        assert_eq!(RiskLevel::Low.max(RiskLevel::Critical), RiskLevel::Critical);
        assert_eq!(RiskLevel::High.max(RiskLevel::Medium), RiskLevel::High);
        assert_eq!(RiskLevel::Medium.max(RiskLevel::Medium), RiskLevel::Medium);
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(RiskLevel::Critical.priority_rank() < RiskLevel::High.priority_rank());
        assert!(RiskLevel::High.priority_rank() < RiskLevel::Medium.priority_rank());
        assert!(RiskLevel::Medium.priority_rank() < RiskLevel::Low.priority_rank());
    }
}
