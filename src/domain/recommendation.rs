//! Final, usage-scaled recommendations.

use super::assessment::ConfidenceAssessment;
use super::money::{Hours, Price};
use super::opportunity::ArbitrageOpportunity;
use super::usage::UsageScenario;

/// An opportunity with its confidence assessment and projected costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    opportunity: ArbitrageOpportunity,
    assessment: ConfidenceAssessment,
    scenario: UsageScenario,
    total_hours: Hours,
    total_cost: Price,
    total_savings: Price,
    monthly_cost: Price,
    monthly_savings: Price,
}

/// Usage-scaled totals computed for a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub total_hours: Hours,
    pub total_cost: Price,
    pub total_savings: Price,
    pub monthly_cost: Price,
    pub monthly_savings: Price,
}

impl Recommendation {
    pub(crate) fn new(
        opportunity: ArbitrageOpportunity,
        assessment: ConfidenceAssessment,
        scenario: UsageScenario,
        projection: Projection,
    ) -> Self {
        Self {
            opportunity,
            assessment,
            scenario,
            total_hours: projection.total_hours,
            total_cost: projection.total_cost,
            total_savings: projection.total_savings,
            monthly_cost: projection.monthly_cost,
            monthly_savings: projection.monthly_savings,
        }
    }

    pub fn opportunity(&self) -> &ArbitrageOpportunity {
        &self.opportunity
    }

    pub fn assessment(&self) -> &ConfidenceAssessment {
        &self.assessment
    }

    pub fn scenario(&self) -> &UsageScenario {
        &self.scenario
    }

    /// Instance-hours covered by the scenario.
    pub fn total_hours(&self) -> Hours {
        self.total_hours
    }

    /// Cost of the scenario at the cheapest provider.
    pub fn total_cost(&self) -> Price {
        self.total_cost
    }

    /// Savings of the scenario versus the most expensive provider.
    pub fn total_savings(&self) -> Price {
        self.total_savings
    }

    /// Average monthly cost at the cheapest provider.
    pub fn monthly_cost(&self) -> Price {
        self.monthly_cost
    }

    /// Average monthly savings versus the most expensive provider.
    pub fn monthly_savings(&self) -> Price {
        self.monthly_savings
    }
}
