//! Recommendation composition and ranking.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    ArbitrageOpportunity, ConfidenceAssessment, Projection, Recommendation, UsageScenario,
};

/// Ordering applied to recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Descending percentage savings.
    #[default]
    Savings,
    /// Descending hourly price difference.
    Difference,
    /// Ascending cheapest hourly price.
    Price,
    /// Descending confidence.
    Confidence,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Savings,
        SortMode::Difference,
        SortMode::Price,
        SortMode::Confidence,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Difference => "difference",
            Self::Price => "price",
            Self::Confidence => "confidence",
        }
    }

    fn compare(self, a: &Recommendation, b: &Recommendation) -> Ordering {
        let (oa, ob) = (a.opportunity(), b.opportunity());
        match self {
            Self::Savings => ob.percentage_savings().cmp(&oa.percentage_savings()),
            Self::Difference => ob
                .price_difference_per_hour()
                .cmp(&oa.price_difference_per_hour()),
            Self::Price => oa
                .cheapest()
                .price_per_hour()
                .cmp(&ob.cheapest().price_per_hour()),
            Self::Confidence => b
                .assessment()
                .confidence()
                .total_cmp(&a.assessment().confidence()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(Self::Savings),
            "difference" | "diff" => Ok(Self::Difference),
            "price" => Ok(Self::Price),
            "confidence" => Ok(Self::Confidence),
            other => Err(format!(
                "unknown sort mode '{other}' (expected savings, difference, price or confidence)"
            )),
        }
    }
}

/// Scales opportunities to a usage scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationComposer {
    scenario: UsageScenario,
}

impl RecommendationComposer {
    #[must_use]
    pub const fn new(scenario: UsageScenario) -> Self {
        Self { scenario }
    }

    #[must_use]
    pub const fn scenario(&self) -> &UsageScenario {
        &self.scenario
    }

    /// Project the opportunity's hourly figures over the scenario.
    #[must_use]
    pub fn project(&self, opportunity: &ArbitrageOpportunity) -> Projection {
        let total_hours = self.scenario.total_hours();
        let monthly_hours = self.scenario.monthly_hours();
        let price = opportunity.cheapest().price_per_hour();
        let difference = opportunity.price_difference_per_hour();

        Projection {
            total_hours,
            total_cost: price * total_hours,
            total_savings: difference * total_hours,
            monthly_cost: price * monthly_hours,
            monthly_savings: difference * monthly_hours,
        }
    }

    #[must_use]
    pub fn compose(
        &self,
        opportunity: ArbitrageOpportunity,
        assessment: ConfidenceAssessment,
    ) -> Recommendation {
        let projection = self.project(&opportunity);
        Recommendation::new(opportunity, assessment, self.scenario, projection)
    }
}

/// Stable in-place sort; equal keys keep their emission order.
pub fn rank(recommendations: &mut [Recommendation], mode: SortMode) {
    recommendations.sort_by(|a, b| mode.compare(a, b));
}
