//! Confidence and risk classification results.

use std::fmt;

use serde::Serialize;

/// Coarse classification of how safe a recommended provider choice is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust attached to the cheapest provider of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceAssessment {
    confidence: f64,
    risk_tier: RiskTier,
    reliability: f64,
}

impl ConfidenceAssessment {
    /// Create an assessment, clamping confidence to `[0, 1]`.
    #[must_use]
    pub fn new(confidence: f64, risk_tier: RiskTier, reliability: f64) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            risk_tier,
            reliability,
        }
    }

    /// Confidence score in `[0, 1]`.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    /// The provider reliability prior that went into the score.
    #[must_use]
    pub fn reliability(&self) -> f64 {
        self.reliability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(ConfidenceAssessment::new(1.2, RiskTier::Low, 0.99).confidence(), 1.0);
        assert_eq!(ConfidenceAssessment::new(-0.1, RiskTier::High, 0.5).confidence(), 0.0);
    }

    #[test]
    fn tiers_order_from_safest() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(RiskTier::Medium.to_string(), "medium");
    }
}
