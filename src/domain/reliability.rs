//! Provider reliability priors.
//!
//! A static estimate of how dependable each provider is, independent of the
//! availability figure on any single price record. Major cloud platforms sit
//! near the top of the range; marketplace and specialised GPU clouds lower.

use std::collections::HashMap;

use super::id::{provider_key, ProviderId};

/// Prior used for providers with no entry.
pub const DEFAULT_RELIABILITY: f64 = 0.50;

const BUILTIN_PRIORS: &[(&str, f64)] = &[
    ("aws", 0.99),
    ("amazon", 0.99),
    ("gcp", 0.99),
    ("google", 0.99),
    ("googlecloud", 0.99),
    ("azure", 0.98),
    ("oracle", 0.96),
    ("coreweave", 0.90),
    ("lambdalabs", 0.80),
    ("lambda", 0.80),
    ("runpod", 0.75),
    ("vast", 0.60),
    ("vastai", 0.60),
];

/// Lookup from provider name to a reliability prior in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ReliabilityPriors {
    priors: HashMap<String, f64>,
    default: f64,
}

impl ReliabilityPriors {
    /// Empty table where every provider gets `default`.
    #[must_use]
    pub fn new(default: f64) -> Self {
        Self {
            priors: HashMap::new(),
            default: default.clamp(0.0, 1.0),
        }
    }

    /// Built-in priors for well-known providers.
    #[must_use]
    pub fn builtin() -> Self {
        let mut priors = Self::new(DEFAULT_RELIABILITY);
        for &(provider, prior) in BUILTIN_PRIORS {
            priors.set(provider, prior);
        }
        priors
    }

    /// Set (or override) the prior for a provider.
    pub fn set(&mut self, provider: &str, prior: f64) {
        self.priors
            .insert(provider_key(provider), prior.clamp(0.0, 1.0));
    }

    /// Replace the fallback prior.
    #[must_use]
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default.clamp(0.0, 1.0);
        self
    }

    /// Prior for `provider`, falling back to the default.
    #[must_use]
    pub fn prior_for(&self, provider: &ProviderId) -> f64 {
        self.priors
            .get(&provider.lookup_key())
            .copied()
            .unwrap_or(self.default)
    }

    /// Whether `provider` has an explicit entry.
    #[must_use]
    pub fn is_known(&self, provider: &ProviderId) -> bool {
        self.priors.contains_key(&provider.lookup_key())
    }

    #[must_use]
    pub fn default_prior(&self) -> f64 {
        self.default
    }
}

impl Default for ReliabilityPriors {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_clouds_rank_above_marketplaces() {
        let priors = ReliabilityPriors::builtin();
        let aws = priors.prior_for(&"AWS".into());
        let vast = priors.prior_for(&"Vast.ai".into());

        assert!(aws >= 0.95);
        assert!((0.6..=0.8).contains(&vast));
    }

    #[test]
    fn lookup_ignores_spelling() {
        let priors = ReliabilityPriors::builtin();
        assert_eq!(priors.prior_for(&"Lambda Labs".into()), 0.80);
        assert_eq!(priors.prior_for(&"lambda_labs".into()), 0.80);
    }

    #[test]
    fn unknown_provider_gets_default() {
        let priors = ReliabilityPriors::builtin().with_default(0.4);
        let provider = ProviderId::from("TinyGPU");

        assert!(!priors.is_known(&provider));
        assert_eq!(priors.prior_for(&provider), 0.4);
    }

    #[test]
    fn overrides_are_clamped() {
        let mut priors = ReliabilityPriors::builtin();
        priors.set("RunPod", 1.5);
        assert_eq!(priors.prior_for(&"runpod".into()), 1.0);
    }
}
