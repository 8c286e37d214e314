//! Supplementary read-only analyses over price data.
//!
//! None of these feed back into detection or classification; they give the
//! presentation layer extra views built from the same normalized values.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::spec::canonicalize;
use crate::domain::{ModelId, NormalizedPrice, Price, PriceRecord, ProviderId};

/// A normalized price placed on the value ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRanking {
    pub price: NormalizedPrice,
    /// 1-based position, best value first.
    pub value_rank: usize,
    /// How much better this score is than the worst one, in percent.
    pub savings_vs_worst_percent: f64,
    /// Score relative to the best one, 0-100.
    pub relative_value_score: f64,
}

/// Order prices by descending cost-performance score.
///
/// Equal scores keep their input order.
#[must_use]
pub fn rank_by_value(prices: &[NormalizedPrice]) -> Vec<ValueRanking> {
    let mut sorted: Vec<&NormalizedPrice> = prices.iter().collect();
    sorted.sort_by(|a, b| {
        b.cost_performance_score()
            .total_cmp(&a.cost_performance_score())
    });

    let best = sorted.first().map_or(0.0, |p| p.cost_performance_score());
    let worst = sorted.last().map_or(0.0, |p| p.cost_performance_score());

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, price)| {
            let score = price.cost_performance_score();
            ValueRanking {
                price: price.clone(),
                value_rank: idx + 1,
                savings_vs_worst_percent: if worst > 0.0 {
                    (score - worst) / worst * 100.0
                } else {
                    0.0
                },
                relative_value_score: if best > 0.0 {
                    score / best * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Best and worst value offers for one GPU model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderComparison {
    pub gpu_model: ModelId,
    pub providers_compared: usize,
    /// Highest cost-performance score.
    pub best: NormalizedPrice,
    /// Lowest cost-performance score.
    pub worst: NormalizedPrice,
    /// `worst - best` hourly price; negative when the worst value is cheaper.
    pub price_difference: Price,
    /// `price_difference` as a percentage of the worst offer's price.
    pub price_difference_percent: Decimal,
}

/// Compare every offer for one GPU model by value score.
///
/// The model name is matched loosely. `None` when nothing matches.
#[must_use]
pub fn compare_providers(
    prices: &[NormalizedPrice],
    gpu_model: &str,
) -> Option<ProviderComparison> {
    let model_key = canonicalize(gpu_model);
    let offers: Vec<NormalizedPrice> = prices
        .iter()
        .filter(|p| canonicalize(p.gpu_model().as_str()) == model_key)
        .cloned()
        .collect();

    let ranked = rank_by_value(&offers);
    let best = ranked.first()?.price.clone();
    let worst = ranked.last()?.price.clone();

    let price_difference = worst.price_per_hour() - best.price_per_hour();
    let price_difference_percent = if worst.price_per_hour() > Decimal::ZERO {
        price_difference / worst.price_per_hour() * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    Some(ProviderComparison {
        gpu_model: best.gpu_model().clone(),
        providers_compared: ranked.len(),
        best,
        worst,
        price_difference,
        price_difference_percent,
    })
}

/// Observed availability statistics for one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderReliability {
    pub provider: ProviderId,
    pub avg_availability: f64,
    pub min_availability: f64,
    pub max_availability: f64,
    /// `1 - sample std-dev`; 1.0 with a single sample.
    pub consistency: f64,
    pub sample_count: usize,
}

/// Summarize availability per provider, best average first.
///
/// Records with out-of-range availability are ignored.
#[must_use]
pub fn provider_reliability<'a, I>(records: I) -> Vec<ProviderReliability>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    let mut by_provider: BTreeMap<&ProviderId, Vec<f64>> = BTreeMap::new();
    for record in records {
        if (0.0..=1.0).contains(&record.availability) {
            by_provider
                .entry(&record.provider)
                .or_default()
                .push(record.availability);
        }
    }

    let mut summary: Vec<_> = by_provider
        .into_iter()
        .map(|(provider, samples)| {
            let stats = sample_stats(&samples);
            ProviderReliability {
                provider: provider.clone(),
                avg_availability: stats.mean,
                min_availability: stats.min,
                max_availability: stats.max,
                consistency: 1.0 - stats.std_dev,
                sample_count: samples.len(),
            }
        })
        .collect();

    // BTreeMap order already breaks ties by provider name
    summary.sort_by(|a, b| b.avg_availability.total_cmp(&a.avg_availability));
    summary
}

/// Price spread of one provider's offers for one model across regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSpread {
    pub provider: ProviderId,
    pub gpu_model: ModelId,
    pub cheapest_region: String,
    pub cheapest_price: Price,
    pub most_expensive_region: String,
    pub most_expensive_price: Price,
    pub price_difference: Price,
    pub percentage_savings: Decimal,
}

/// Compare regions for a single provider and model.
///
/// Provider and model names are matched loosely (case and separators do not
/// matter). Returns `None` with fewer than two offers or no spread.
#[must_use]
pub fn cross_region_spread(
    prices: &[NormalizedPrice],
    provider: &str,
    gpu_model: &str,
) -> Option<RegionSpread> {
    let provider_key = ProviderId::new(provider).lookup_key();
    let model_key = canonicalize(gpu_model);

    let offers: Vec<&NormalizedPrice> = prices
        .iter()
        .filter(|p| p.provider().lookup_key() == provider_key)
        .filter(|p| canonicalize(p.gpu_model().as_str()) == model_key)
        .collect();
    if offers.len() < 2 {
        return None;
    }

    let by_price = |a: &&NormalizedPrice, b: &&NormalizedPrice| -> Ordering {
        a.price_per_hour()
            .cmp(&b.price_per_hour())
            .then_with(|| a.region().cmp(b.region()))
    };
    let cheapest = offers.iter().min_by(|a, b| by_price(a, b))?;
    let most_expensive = offers.iter().max_by(|a, b| by_price(a, b))?;

    let difference = most_expensive.price_per_hour() - cheapest.price_per_hour();
    if difference <= Decimal::ZERO {
        return None;
    }

    Some(RegionSpread {
        provider: cheapest.provider().clone(),
        gpu_model: cheapest.gpu_model().clone(),
        cheapest_region: cheapest.region().to_string(),
        cheapest_price: cheapest.price_per_hour(),
        most_expensive_region: most_expensive.region().to_string(),
        most_expensive_price: most_expensive.price_per_hour(),
        price_difference: difference,
        percentage_savings: difference / most_expensive.price_per_hour() * Decimal::ONE_HUNDRED,
    })
}

/// Descriptive statistics over historical price samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStatistics {
    pub count: usize,
    pub mean: Price,
    pub min: Price,
    pub max: Price,
    /// Sample standard deviation; 0 with a single sample.
    pub std_dev: f64,
    /// Coefficient of variation, `std_dev / mean * 100`.
    pub volatility_percent: f64,
}

/// Summarize a series of observed prices.
///
/// `None` for an empty series, or when the total does not fit in a `Decimal`.
#[must_use]
pub fn price_statistics(samples: &[Price]) -> Option<PriceStatistics> {
    let min = samples.iter().min().copied()?;
    let max = samples.iter().max().copied()?;
    let total = samples
        .iter()
        .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(*price))?;
    let mean = total / Decimal::from(samples.len());

    let floats: Vec<f64> = samples.iter().filter_map(|p| p.to_f64()).collect();
    let std_dev = sample_stats(&floats).std_dev;
    let mean_f64 = mean.to_f64().unwrap_or(0.0);

    Some(PriceStatistics {
        count: samples.len(),
        mean,
        min,
        max,
        std_dev,
        volatility_percent: if mean_f64 > 0.0 {
            std_dev / mean_f64 * 100.0
        } else {
            0.0
        },
    })
}

/// An offer whose price sits unusually far from its peers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAnomaly {
    pub price: NormalizedPrice,
    /// Distance from the mean in sample standard deviations.
    pub deviation_std_devs: f64,
    /// Signed distance from the mean, USD per hour.
    pub deviation_from_mean: f64,
}

/// Default cut-off for [`price_anomalies`], in standard deviations.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Fewest prices that give a meaningful spread.
const MIN_ANOMALY_SAMPLES: usize = 3;

/// Flag prices more than `threshold_std_devs` sample standard deviations
/// from the mean, in input order.
///
/// Fewer than three prices, or prices that are all equal, flag nothing.
#[must_use]
pub fn price_anomalies(prices: &[NormalizedPrice], threshold_std_devs: f64) -> Vec<PriceAnomaly> {
    if prices.len() < MIN_ANOMALY_SAMPLES {
        return Vec::new();
    }

    let values: Vec<f64> = prices
        .iter()
        .map(|p| p.price_per_hour().to_f64().unwrap_or(f64::INFINITY))
        .collect();
    let stats = sample_stats(&values);

    prices
        .iter()
        .zip(values)
        .filter_map(|(price, value)| {
            let deviation_from_mean = value - stats.mean;
            let deviation_std_devs = if stats.std_dev > 0.0 {
                deviation_from_mean.abs() / stats.std_dev
            } else {
                0.0
            };
            (deviation_std_devs > threshold_std_devs).then(|| PriceAnomaly {
                price: price.clone(),
                deviation_std_devs,
                deviation_from_mean,
            })
        })
        .collect()
}

struct SampleStats {
    mean: f64,
    min: f64,
    max: f64,
    std_dev: f64,
}

fn sample_stats(samples: &[f64]) -> SampleStats {
    if samples.is_empty() {
        return SampleStats {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            std_dev: 0.0,
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = if samples.len() > 1 {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    SampleStats {
        mean,
        min,
        max,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer::Normalizer;
    use crate::domain::{Precision, SpecTable};
    use rust_decimal_macros::dec;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn normalize(records: &[PriceRecord]) -> Vec<NormalizedPrice> {
        let table = SpecTable::builtin();
        Normalizer::new(&table, Precision::Fp32)
            .normalize_batch(records)
            .prices
    }

    #[test]
    fn value_ranking_orders_best_first() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(0.80), 1.0),
            PriceRecord::new("Vast", "T4", "us", dec!(0.20), 1.0),
            PriceRecord::new("GCP", "T4", "us", dec!(0.40), 1.0),
        ]);

        let ranked = rank_by_value(&prices);
        let providers: Vec<_> = ranked.iter().map(|r| r.price.provider().as_str()).collect();
        assert_eq!(providers, vec!["Vast", "GCP", "AWS"]);
        assert_eq!(ranked[0].value_rank, 1);
        assert!(approx_eq(ranked[0].relative_value_score, 100.0));
        // Same GPU: score ratio is the inverse price ratio
        assert!(approx_eq(ranked[1].relative_value_score, 50.0));
        assert!(approx_eq(ranked[0].savings_vs_worst_percent, 300.0));
        assert!(approx_eq(ranked[2].savings_vs_worst_percent, 0.0));
    }

    #[test]
    fn value_ranking_ties_keep_input_order() {
        let prices = normalize(&[
            PriceRecord::new("B", "T4", "us", dec!(0.40), 1.0),
            PriceRecord::new("A", "T4", "us", dec!(0.40), 1.0),
        ]);
        let ranked = rank_by_value(&prices);
        assert_eq!(ranked[0].price.provider().as_str(), "B");
    }

    #[test]
    fn value_ranking_of_nothing_is_empty() {
        assert!(rank_by_value(&[]).is_empty());
    }

    #[test]
    fn provider_reliability_summarizes_availability() {
        let records = vec![
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.9),
            PriceRecord::new("AWS", "V100", "us-east-1", dec!(3.06), 0.7),
            PriceRecord::new("GCP", "A100", "us-central1", dec!(3.67), 0.95),
        ];

        let summary = provider_reliability(&records);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].provider.as_str(), "GCP");
        assert!(approx_eq(summary[0].consistency, 1.0));
        assert_eq!(summary[0].sample_count, 1);

        let aws = &summary[1];
        assert!(approx_eq(aws.avg_availability, 0.8));
        assert!(approx_eq(aws.min_availability, 0.7));
        assert!(approx_eq(aws.max_availability, 0.9));
        // stdev of [0.9, 0.7] is sqrt(0.02)
        assert!(approx_eq(aws.consistency, 1.0 - 0.02_f64.sqrt()));
    }

    #[test]
    fn provider_reliability_ties_sort_by_name() {
        let records = vec![
            PriceRecord::new("Zeta", "T4", "us", dec!(0.3), 0.8),
            PriceRecord::new("Alpha", "T4", "us", dec!(0.3), 0.8),
        ];
        let summary = provider_reliability(&records);
        assert_eq!(summary[0].provider.as_str(), "Alpha");
    }

    #[test]
    fn cross_region_spread_finds_cheaper_region() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.9),
            PriceRecord::new("AWS", "A100", "eu-west-1", dec!(36.05), 0.9),
            PriceRecord::new("GCP", "A100", "us-central1", dec!(3.67), 0.95),
        ]);

        let spread = cross_region_spread(&prices, "aws", "a100").unwrap();
        assert_eq!(spread.cheapest_region, "us-east-1");
        assert_eq!(spread.most_expensive_region, "eu-west-1");
        assert_eq!(spread.price_difference, dec!(3.28));
    }

    #[test]
    fn cross_region_spread_needs_two_distinct_prices() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.9),
            PriceRecord::new("AWS", "A100", "us-west-2", dec!(32.77), 0.9),
        ]);
        assert!(cross_region_spread(&prices, "AWS", "A100").is_none());
        assert!(cross_region_spread(&prices[..1], "AWS", "A100").is_none());
    }

    #[test]
    fn price_statistics_are_deterministic() {
        let samples = [dec!(2.00), dec!(4.00), dec!(6.00)];
        let stats = price_statistics(&samples).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, dec!(4));
        assert_eq!(stats.min, dec!(2.00));
        assert_eq!(stats.max, dec!(6.00));
        assert!(approx_eq(stats.std_dev, 2.0));
        assert!(approx_eq(stats.volatility_percent, 50.0));
        assert_eq!(price_statistics(&samples), Some(stats));
    }

    #[test]
    fn price_statistics_overflowing_total_is_none() {
        assert!(price_statistics(&[Decimal::MAX, Decimal::MAX]).is_none());
    }

    #[test]
    fn price_statistics_single_and_empty() {
        assert!(price_statistics(&[]).is_none());
        let stats = price_statistics(&[dec!(1.5)]).unwrap();
        assert!(approx_eq(stats.std_dev, 0.0));
        assert!(approx_eq(stats.volatility_percent, 0.0));
    }

    #[test]
    fn anomalies_need_three_prices() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(0.20), 0.9),
            PriceRecord::new("GCP", "T4", "us", dec!(90.00), 0.9),
        ]);
        assert!(price_anomalies(&prices, 0.5).is_empty());
    }

    #[test]
    fn anomalies_of_identical_prices_are_empty() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "T4", "us", dec!(0.35), 0.9),
            PriceRecord::new("GCP", "T4", "us", dec!(0.35), 0.9),
            PriceRecord::new("Vast", "T4", "us", dec!(0.35), 0.9),
        ]);
        assert!(price_anomalies(&prices, 0.0).is_empty());
    }

    #[test]
    fn anomalies_respect_threshold() {
        // [1, 1, 1, 9]: mean 3, stdev 4, so 9 sits 1.5 stdevs out and 1 sits 0.5
        let prices = normalize(&[
            PriceRecord::new("A", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("B", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("C", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("D", "T4", "us", dec!(9), 0.9),
        ]);

        let flagged = price_anomalies(&prices, 1.0);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].price.provider().as_str(), "D");
        assert!(approx_eq(flagged[0].deviation_std_devs, 1.5));
        assert!(approx_eq(flagged[0].deviation_from_mean, 6.0));

        assert!(price_anomalies(&prices, 1.5).is_empty());
        assert_eq!(price_anomalies(&prices, 0.4).len(), 4);
    }

    #[test]
    fn compare_providers_picks_best_and_worst_value() {
        let prices = normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(4.00), 1.0),
            PriceRecord::new("Vast", "a100-80gb", "eu", dec!(1.00), 1.0),
            PriceRecord::new("GCP", "A100", "us-central1", dec!(2.00), 1.0),
            PriceRecord::new("GCP", "T4", "us-central1", dec!(0.10), 1.0),
        ]);

        let comparison = compare_providers(&prices, "a100").unwrap();
        assert_eq!(comparison.gpu_model.as_str(), "A100");
        assert_eq!(comparison.providers_compared, 3);
        assert_eq!(comparison.best.provider().as_str(), "Vast");
        assert_eq!(comparison.worst.provider().as_str(), "AWS");
        assert_eq!(comparison.price_difference, dec!(3.00));
        assert_eq!(comparison.price_difference_percent, dec!(75));
    }

    #[test]
    fn compare_providers_without_offers_is_none() {
        let prices = normalize(&[PriceRecord::new("AWS", "T4", "us", dec!(0.50), 0.9)]);
        assert!(compare_providers(&prices, "H100").is_none());
    }
}
