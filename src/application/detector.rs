//! Arbitrage detection logic.
//!
//! Partitions normalized prices by canonical GPU model and reduces each
//! partition to its cheapest and most expensive offer. Partitions never
//! interact, so the work is a plain group / reduce / filter.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{ArbitrageOpportunity, NormalizedPrice};

/// Fewest distinct providers that can form an opportunity.
pub const MIN_DISTINCT_PROVIDERS: usize = 2;

/// Configuration for the arbitrage detector
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectorConfig {
    /// Minimum percentage savings (0-100) to report an opportunity
    #[serde(default = "default_min_percentage_savings")]
    pub min_percentage_savings: Decimal,

    /// Minimum absolute spread in USD per hour
    #[serde(default)]
    pub min_price_difference: Decimal,

    /// Minimum number of distinct providers offering the model
    #[serde(default = "default_min_providers")]
    pub min_providers: usize,
}

fn default_min_percentage_savings() -> Decimal {
    Decimal::from(10)
}

const fn default_min_providers() -> usize {
    MIN_DISTINCT_PROVIDERS
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_percentage_savings: default_min_percentage_savings(),
            min_price_difference: Decimal::ZERO,
            min_providers: default_min_providers(),
        }
    }
}

/// Detects cross-provider price spreads per GPU model.
///
/// Holds only configuration: repeated calls with the same input produce the
/// same output in the same order.
#[derive(Debug, Clone, Default)]
pub struct ArbitrageDetector {
    config: DetectorConfig,
}

impl ArbitrageDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Lazily emit one opportunity per eligible GPU model.
    ///
    /// Partitions are visited in ascending model order. Models with fewer
    /// than two distinct providers, or whose spread is below either
    /// threshold, are skipped silently.
    pub fn detect<'a>(
        &'a self,
        prices: &'a [NormalizedPrice],
    ) -> impl Iterator<Item = ArbitrageOpportunity> + 'a {
        partition(prices)
            .into_iter()
            .filter_map(move |(model, group)| self.evaluate(model, &group))
    }

    /// Reduce one partition to an opportunity, if it qualifies.
    fn evaluate(&self, model: &str, group: &[&NormalizedPrice]) -> Option<ArbitrageOpportunity> {
        let distinct = group
            .iter()
            .map(|price| price.provider().lookup_key())
            .collect::<BTreeSet<_>>()
            .len();
        let required = self.config.min_providers.max(MIN_DISTINCT_PROVIDERS);
        if distinct < required {
            debug!(gpu_model = model, distinct, required, "Skipping: insufficient providers");
            return None;
        }

        let cheapest = group.iter().copied().min_by(|a, b| offer_order(a, b))?;
        let most_expensive = group.iter().copied().max_by(|a, b| offer_order(a, b))?;

        let opportunity = match ArbitrageOpportunity::builder()
            .cheapest(cheapest.clone())
            .most_expensive(most_expensive.clone())
            .providers_offering(group.len())
            .distinct_providers(distinct)
            .build()
        {
            Ok(opportunity) => opportunity,
            Err(e) => {
                debug!(gpu_model = model, error = %e, "Skipping: unusable spread");
                return None;
            }
        };

        if opportunity.percentage_savings() < self.config.min_percentage_savings {
            debug!(
                gpu_model = model,
                savings = %opportunity.percentage_savings().round_dp(2),
                threshold = %self.config.min_percentage_savings,
                "Skipping: below savings threshold"
            );
            return None;
        }
        if opportunity.price_difference_per_hour() < self.config.min_price_difference {
            debug!(
                gpu_model = model,
                difference = %opportunity.price_difference_per_hour(),
                threshold = %self.config.min_price_difference,
                "Skipping: below price difference threshold"
            );
            return None;
        }

        Some(opportunity)
    }
}

/// Group prices by canonical model, preserving input order within a group.
#[must_use]
pub fn partition(prices: &[NormalizedPrice]) -> BTreeMap<&str, Vec<&NormalizedPrice>> {
    let mut groups: BTreeMap<&str, Vec<&NormalizedPrice>> = BTreeMap::new();
    for price in prices {
        groups.entry(price.gpu_model().as_str()).or_default().push(price);
    }
    groups
}

/// Offer ordering shared by both ends of a partition: price ascending, then
/// availability descending, then provider name ascending.
///
/// The minimum is the preferred cheapest offer (highest availability,
/// smallest name on ties); the maximum is the preferred most expensive one
/// (lowest availability, largest name on ties).
fn offer_order(a: &NormalizedPrice, b: &NormalizedPrice) -> Ordering {
    a.price_per_hour()
        .cmp(&b.price_per_hour())
        .then_with(|| b.availability().total_cmp(&a.availability()))
        .then_with(|| a.provider().cmp(b.provider()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer::Normalizer;
    use crate::domain::{Precision, PriceRecord, SpecTable};
    use rust_decimal_macros::dec;

    fn normalize(records: &[PriceRecord]) -> Vec<NormalizedPrice> {
        let table = SpecTable::builtin();
        Normalizer::new(&table, Precision::Fp32)
            .normalize_batch(records)
            .prices
    }

    fn make_config() -> DetectorConfig {
        DetectorConfig::default()
    }

    #[test]
    fn test_detects_spread_between_two_providers() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
            PriceRecord::new("LambdaLabs", "A100", "us-west-1", dec!(1.10), 0.55),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opps: Vec<_> = detector.detect(&prices).collect();
        assert_eq!(opps.len(), 1);

        let opp = &opps[0];
        assert_eq!(opp.cheapest().provider().as_str(), "LambdaLabs");
        assert_eq!(opp.most_expensive().provider().as_str(), "AWS");
        assert_eq!(opp.price_difference_per_hour(), dec!(31.67));
        assert_eq!(opp.percentage_savings().round_dp(2), dec!(96.64));
    }

    #[test]
    fn test_single_provider_yields_nothing() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
            PriceRecord::new("AWS", "A100", "eu-west-1", dec!(20.00), 0.90),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        assert_eq!(detector.detect(&prices).count(), 0);
    }

    #[test]
    fn test_tie_on_price_prefers_higher_availability() {
        let prices = normalize(&[
            PriceRecord::new("RunPod", "A10", "us", dec!(0.60), 0.7),
            PriceRecord::new("Vast", "A10", "us", dec!(0.60), 0.9),
            PriceRecord::new("AWS", "A10", "us", dec!(1.20), 0.99),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opp = detector.detect(&prices).next().unwrap();
        assert_eq!(opp.cheapest().provider().as_str(), "Vast");
    }

    #[test]
    fn test_full_tie_prefers_smaller_provider_name() {
        let prices = normalize(&[
            PriceRecord::new("Zeta", "T4", "us", dec!(0.20), 0.8),
            PriceRecord::new("Alpha", "T4", "us", dec!(0.20), 0.8),
            PriceRecord::new("Mid", "T4", "us", dec!(0.50), 0.8),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opp = detector.detect(&prices).next().unwrap();
        assert_eq!(opp.cheapest().provider().as_str(), "Alpha");
    }

    #[test]
    fn test_most_expensive_tie_prefers_lower_availability_then_larger_name() {
        let prices = normalize(&[
            PriceRecord::new("Cheap", "V100", "us", dec!(0.40), 0.8),
            PriceRecord::new("Beta", "V100", "us", dec!(2.00), 0.9),
            PriceRecord::new("Alpha", "V100", "us", dec!(2.00), 0.6),
            PriceRecord::new("Gamma", "V100", "us", dec!(2.00), 0.6),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opp = detector.detect(&prices).next().unwrap();
        assert_eq!(opp.most_expensive().provider().as_str(), "Gamma");
    }

    #[test]
    fn test_below_threshold_is_filtered() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(1.00), 0.9),
            PriceRecord::new("GCP", "T4", "us", dec!(0.95), 0.9),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        // 5% savings < default 10%
        assert_eq!(detector.detect(&prices).count(), 0);

        let permissive = ArbitrageDetector::new(DetectorConfig {
            min_percentage_savings: dec!(5),
            ..make_config()
        });
        assert_eq!(permissive.detect(&prices).count(), 1);
    }

    #[test]
    fn test_min_price_difference_filters() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(0.50), 0.9),
            PriceRecord::new("Vast", "T4", "us", dec!(0.20), 0.6),
        ]);
        let detector = ArbitrageDetector::new(DetectorConfig {
            min_price_difference: dec!(0.50),
            ..make_config()
        });

        assert_eq!(detector.detect(&prices).count(), 0);
    }

    #[test]
    fn test_min_providers_raises_requirement() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(0.50), 0.9),
            PriceRecord::new("Vast", "T4", "us", dec!(0.20), 0.6),
        ]);
        let detector = ArbitrageDetector::new(DetectorConfig {
            min_providers: 3,
            ..make_config()
        });

        assert_eq!(detector.detect(&prices).count(), 0);
    }

    #[test]
    fn test_provider_spelling_variants_count_once() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us-east-1", dec!(0.50), 0.9),
            PriceRecord::new("aws", "T4", "us-west-2", dec!(0.20), 0.9),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        assert_eq!(detector.detect(&prices).count(), 0);
    }

    #[test]
    fn test_distinct_providers_ignore_case() {
        let prices = normalize(&[
            PriceRecord::new("Lambda Labs", "A100", "us-west-1", dec!(1.10), 0.55),
            PriceRecord::new("lambdalabs", "A100", "us-east-1", dec!(1.20), 0.55),
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opp = detector.detect(&prices).next().unwrap();
        assert_eq!(opp.providers_offering(), 3);
        assert_eq!(opp.distinct_providers(), 2);
    }

    #[test]
    fn test_overflowing_partition_does_not_hide_others() {
        let table = SpecTable::builtin();
        let offer = |provider: &str, model: &str, price| {
            let record = PriceRecord::new(provider, model, "us", price, 0.9);
            NormalizedPrice::new(&record, table.lookup(model).unwrap(), Precision::Fp32)
        };
        let huge = rust_decimal::Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let prices = vec![
            offer("AWS", "A100", huge),
            offer("Vast", "A100", dec!(1.00)),
            offer("GCP", "T4", dec!(1.00)),
            offer("Vast", "T4", dec!(0.20)),
        ];
        let detector = ArbitrageDetector::new(make_config());

        let models: Vec<_> = detector
            .detect(&prices)
            .map(|opp| opp.gpu_model().to_string())
            .collect();
        assert_eq!(models, vec!["T4"]);
    }

    #[test]
    fn test_min_providers_below_two_is_floored() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "a", dec!(0.50), 0.9),
            PriceRecord::new("AWS", "T4", "b", dec!(0.20), 0.9),
        ]);
        let detector = ArbitrageDetector::new(DetectorConfig {
            min_providers: 1,
            ..make_config()
        });

        assert_eq!(detector.detect(&prices).count(), 0);
    }

    #[test]
    fn test_providers_offering_counts_partition_records() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
            PriceRecord::new("AWS", "A100", "eu-west-1", dec!(30.00), 0.92),
            PriceRecord::new("LambdaLabs", "A100", "us-west-1", dec!(1.10), 0.55),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let opp = detector.detect(&prices).next().unwrap();
        assert_eq!(opp.providers_offering(), 3);
        assert_eq!(opp.distinct_providers(), 2);
    }

    #[test]
    fn test_aliases_share_a_partition() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100-80GB", "us-east-1", dec!(32.77), 0.92),
            PriceRecord::new("LambdaLabs", "A100", "us-west-1", dec!(1.10), 0.55),
            PriceRecord::new("GCP", "A100-40GB", "us-central1", dec!(3.67), 0.95),
        ]);

        let groups = partition(&prices);
        assert_eq!(groups["A100"].len(), 2);
        assert_eq!(groups["A100-40GB"].len(), 1);
    }

    #[test]
    fn test_emission_order_is_by_model() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "V100", "us", dec!(3.06), 0.9),
            PriceRecord::new("Vast", "V100", "us", dec!(0.40), 0.6),
            PriceRecord::new("AWS", "A10", "us", dec!(1.20), 0.9),
            PriceRecord::new("Vast", "A10", "us", dec!(0.30), 0.6),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let models: Vec<_> = detector
            .detect(&prices)
            .map(|opp| opp.gpu_model().to_string())
            .collect();
        assert_eq!(models, vec!["A10", "V100"]);
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let detector = ArbitrageDetector::new(make_config());
        assert_eq!(detector.detect(&[]).count(), 0);
    }

    #[test]
    fn test_repeated_detection_is_identical() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "H100", "us", dec!(12.29), 0.9),
            PriceRecord::new("RunPod", "H100", "us", dec!(2.99), 0.7),
            PriceRecord::new("Vast", "H100", "us", dec!(2.49), 0.5),
        ]);
        let detector = ArbitrageDetector::new(make_config());

        let first: Vec<_> = detector.detect(&prices).collect();
        let second: Vec<_> = detector.detect(&prices).collect();
        assert_eq!(first, second);
    }
}
