//! Confidence and risk classification.
//!
//! Each opportunity is scored on its own from the cheapest offer's
//! availability, the provider's reliability prior and how many offers back
//! the market. The result never depends on classification order.

use serde::Deserialize;

use crate::domain::{ArbitrageOpportunity, ConfidenceAssessment, ReliabilityPriors, RiskTier};

/// Reliability needed for a low-risk tier.
pub const LOW_RISK_RELIABILITY: f64 = 0.95;
/// Availability needed for a low-risk tier.
pub const LOW_RISK_AVAILABILITY: f64 = 0.90;
/// Reliability needed for a medium-risk tier.
pub const MEDIUM_RISK_RELIABILITY: f64 = 0.70;
/// Availability needed for a medium-risk tier.
pub const MEDIUM_RISK_AVAILABILITY: f64 = 0.60;

/// Weights of the confidence blend.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConfidenceWeights {
    /// Weight of the cheapest offer's availability
    #[serde(default = "default_availability_weight")]
    pub availability: f64,

    /// Weight of the provider's reliability prior
    #[serde(default = "default_reliability_weight")]
    pub reliability: f64,

    /// Weight of the market-density term
    #[serde(default = "default_density_weight")]
    pub density: f64,

    /// Offer count at which the density term saturates
    #[serde(default = "default_density_saturation")]
    pub density_saturation: f64,
}

const fn default_availability_weight() -> f64 {
    0.4
}

const fn default_reliability_weight() -> f64 {
    0.4
}

const fn default_density_weight() -> f64 {
    0.2
}

const fn default_density_saturation() -> f64 {
    6.0
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            availability: default_availability_weight(),
            reliability: default_reliability_weight(),
            density: default_density_weight(),
            density_saturation: default_density_saturation(),
        }
    }
}

impl ConfidenceWeights {
    /// Sum of the three blend weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.availability + self.reliability + self.density
    }

    /// Market-density term in `[0, 1]`.
    #[must_use]
    pub fn density_term(&self, providers_offering: usize) -> f64 {
        if self.density_saturation <= 0.0 {
            return 1.0;
        }
        (providers_offering as f64 / self.density_saturation).min(1.0)
    }
}

/// Blend availability, reliability and market density into a score in `[0, 1]`.
#[must_use]
pub fn confidence(
    weights: &ConfidenceWeights,
    availability: f64,
    reliability: f64,
    providers_offering: usize,
) -> f64 {
    let score = weights.availability * availability
        + weights.reliability * reliability
        + weights.density * weights.density_term(providers_offering);
    score.clamp(0.0, 1.0)
}

/// Map reliability and availability onto a risk tier.
#[must_use]
pub fn risk_tier(reliability: f64, availability: f64) -> RiskTier {
    if reliability >= LOW_RISK_RELIABILITY && availability >= LOW_RISK_AVAILABILITY {
        RiskTier::Low
    } else if reliability >= MEDIUM_RISK_RELIABILITY && availability >= MEDIUM_RISK_AVAILABILITY {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Assigns a confidence score and risk tier to opportunities.
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    priors: ReliabilityPriors,
    weights: ConfidenceWeights,
}

impl RiskClassifier {
    #[must_use]
    pub fn new(priors: ReliabilityPriors, weights: ConfidenceWeights) -> Self {
        Self { priors, weights }
    }

    #[must_use]
    pub fn priors(&self) -> &ReliabilityPriors {
        &self.priors
    }

    #[must_use]
    pub fn weights(&self) -> &ConfidenceWeights {
        &self.weights
    }

    /// Classify the recommended (cheapest) side of an opportunity.
    #[must_use]
    pub fn classify(&self, opportunity: &ArbitrageOpportunity) -> ConfidenceAssessment {
        let cheapest = opportunity.cheapest();
        let reliability = self.priors.prior_for(cheapest.provider());
        self.assess(
            cheapest.availability(),
            reliability,
            opportunity.providers_offering(),
        )
    }

    /// Classify from raw inputs.
    #[must_use]
    pub fn assess(
        &self,
        availability: f64,
        reliability: f64,
        providers_offering: usize,
    ) -> ConfidenceAssessment {
        ConfidenceAssessment::new(
            confidence(&self.weights, availability, reliability, providers_offering),
            risk_tier(reliability, availability),
            reliability,
        )
    }
}
