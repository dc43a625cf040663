//! Status and risk distribution counters.

use serde::Serialize;

use posture_core::types::{ControlStatus, RiskLevel};

/// Count of applicable baseline slots per status, including slots with
/// no assessment row (counted as Not Assessed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub implemented: u64,
    pub partially_implemented: u64,
    pub not_implemented: u64,
    pub not_applicable: u64,
    pub not_assessed: u64,
}

impl StatusBreakdown {
    pub fn observe(&mut self, status: ControlStatus) {
        match status {
            ControlStatus::Implemented => self.implemented += 1,
            ControlStatus::PartiallyImplemented => self.partially_implemented += 1,
            ControlStatus::NotImplemented => self.not_implemented += 1,
            ControlStatus::NotApplicable => self.not_applicable += 1,
            ControlStatus::NotAssessed => self.not_assessed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.implemented
            + self.partially_implemented
            + self.not_implemented
            + self.not_applicable
            + self.not_assessed
    }
}

/// Count of observations per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

impl RiskBreakdown {
    pub fn observe(&mut self, risk: RiskLevel) {
        match risk {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high + self.critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_breakdown_counts() {
        let mut breakdown = StatusBreakdown::default();
        breakdown.observe(ControlStatus::Implemented);
        breakdown.observe(ControlStatus::Implemented);
        breakdown.observe(ControlStatus::NotAssessed);
        assert_eq!(breakdown.implemented, 2);
        assert_eq!(breakdown.not_assessed, 1);
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn test_risk_breakdown_counts() {
        let mut breakdown = RiskBreakdown::default();
        breakdown.observe(RiskLevel::Critical);
        breakdown.observe(RiskLevel::Low);
        breakdown.observe(RiskLevel::Critical);
        assert_eq!(breakdown.critical, 2);
        assert_eq!(breakdown.low, 1);
        assert_eq!(breakdown.total(), 3);
    }
}
