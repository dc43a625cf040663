//! Cache topics and the mutation → invalidation table.

use smallvec::SmallVec;

/// Key of one cached view: view kind plus the scope it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    SystemScore(i64),
    ProductCompliance(i64),
    FunctionCompliance(i64),
    Matrix(i64),
    GapAnalysis(i64),
    Baseline(i64),
    Systems(i64),
    RiskSummary,
    Hierarchy,
}

/// A mutation, described precisely enough to drive invalidation.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Assessment created, updated, or deleted on a system.
    AssessmentWrite { product_id: i64, system_id: i64 },
    /// System created, updated, or deleted under a product.
    SystemChanged { product_id: i64 },
    /// Baseline entries changed for a product. Carries the product's
    /// system ids so every downstream per-system aggregate drops too.
    BaselineChanged {
        product_id: i64,
        system_ids: Vec<i64>,
    },
}

impl Mutation {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::AssessmentWrite { .. } => "assessment-write",
            Self::SystemChanged { .. } => "system-changed",
            Self::BaselineChanged { .. } => "baseline-changed",
        }
    }

    /// The fixed invalidation table.
    pub fn invalidates(&self) -> SmallVec<[Topic; 8]> {
        let mut topics = SmallVec::new();
        match self {
            Self::AssessmentWrite {
                product_id,
                system_id,
            } => {
                topics.push(Topic::SystemScore(*system_id));
                topics.push(Topic::Matrix(*product_id));
                topics.push(Topic::GapAnalysis(*product_id));
                topics.push(Topic::FunctionCompliance(*product_id));
                topics.push(Topic::ProductCompliance(*product_id));
                topics.push(Topic::RiskSummary);
                topics.push(Topic::Hierarchy);
            }
            Self::SystemChanged { product_id } => {
                topics.push(Topic::Systems(*product_id));
                topics.push(Topic::Matrix(*product_id));
                topics.push(Topic::GapAnalysis(*product_id));
                topics.push(Topic::FunctionCompliance(*product_id));
                topics.push(Topic::ProductCompliance(*product_id));
                topics.push(Topic::RiskSummary);
                topics.push(Topic::Hierarchy);
            }
            Self::BaselineChanged {
                product_id,
                system_ids,
            } => {
                topics.push(Topic::Baseline(*product_id));
                topics.push(Topic::Matrix(*product_id));
                topics.push(Topic::GapAnalysis(*product_id));
                topics.push(Topic::FunctionCompliance(*product_id));
                topics.push(Topic::ProductCompliance(*product_id));
                for system_id in system_ids {
                    topics.push(Topic::SystemScore(*system_id));
                }
                topics.push(Topic::RiskSummary);
                topics.push(Topic::Hierarchy);
            }
        }
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_write_invalidates_its_scope_only() {
        let topics = Mutation::AssessmentWrite {
            product_id: 1,
            system_id: 10,
        }
        .invalidates();

        assert!(topics.contains(&Topic::SystemScore(10)));
        assert!(topics.contains(&Topic::Matrix(1)));
        assert!(topics.contains(&Topic::GapAnalysis(1)));
        assert!(topics.contains(&Topic::Hierarchy));
        // Sibling scopes stay untouched.
        assert!(!topics.contains(&Topic::SystemScore(11)));
        assert!(!topics.contains(&Topic::Matrix(2)));
    }

    #[test]
    fn test_baseline_change_cascades_to_every_system_score() {
        let topics = Mutation::BaselineChanged {
            product_id: 1,
            system_ids: vec![10, 11],
        }
        .invalidates();
        assert!(topics.contains(&Topic::Baseline(1)));
        assert!(topics.contains(&Topic::SystemScore(10)));
        assert!(topics.contains(&Topic::SystemScore(11)));
    }

    #[test]
    fn test_system_change_invalidates_product_aggregates() {
        let topics = Mutation::SystemChanged { product_id: 3 }.invalidates();
        assert!(topics.contains(&Topic::Systems(3)));
        assert!(topics.contains(&Topic::ProductCompliance(3)));
        assert!(topics.contains(&Topic::Hierarchy));
    }
}
