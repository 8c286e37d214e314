//! Handler for the `values` command.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ValuesArgs;
use crate::adapter::inbound::cli::{context, output, render};
use crate::application::analytics::{
    compare_providers, price_anomalies, price_statistics, rank_by_value, PriceAnomaly,
    PriceStatistics, ProviderComparison, ValueRanking,
};
use crate::domain::NormalizedPrice;
use crate::error::Result;

#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "TFLOPS")]
    tflops: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "$/TFLOP")]
    cost_per_tflop: String,
    #[tabled(rename = "Relative")]
    relative: String,
}

impl ValueRow {
    fn new(entry: &ValueRanking) -> Self {
        let price = &entry.price;
        Self {
            rank: entry.value_rank,
            gpu: price.gpu_model().to_string(),
            provider: price.provider().to_string(),
            region: price.region().to_string(),
            price: render::hourly(price.price_per_hour()),
            tflops: format!("{:.1}", price.throughput_rating()),
            score: format!("{:.2}", price.cost_performance_score()),
            cost_per_tflop: format!("{:.4}", price.cost_per_tflop()),
            relative: format!("{:.0}%", entry.relative_value_score),
        }
    }
}

#[derive(Tabled)]
struct StatisticsRow {
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Offers")]
    count: usize,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Spread")]
    volatility: String,
}

#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "vs Mean")]
    deviation: String,
    #[tabled(rename = "Std Devs")]
    std_devs: String,
}

impl AnomalyRow {
    fn new(anomaly: &PriceAnomaly) -> Self {
        let price = &anomaly.price;
        Self {
            gpu: price.gpu_model().to_string(),
            provider: price.provider().to_string(),
            region: price.region().to_string(),
            price: render::hourly(price.price_per_hour()),
            deviation: format!("{:+.2}", anomaly.deviation_from_mean),
            std_devs: format!("{:.1}", anomaly.deviation_std_devs),
        }
    }
}

fn value_json(entry: &ValueRanking) -> Value {
    let price = &entry.price;
    json!({
        "value_rank": entry.value_rank,
        "gpu_model": price.gpu_model().as_str(),
        "provider": price.provider().as_str(),
        "region": price.region(),
        "price_per_hour": render::number(price.price_per_hour(), 4),
        "availability": price.availability(),
        "precision": price.precision(),
        "throughput_rating": price.throughput_rating(),
        "cost_performance_score": price.cost_performance_score(),
        "cost_per_tflop": price.cost_per_tflop(),
        "savings_vs_worst_percent": entry.savings_vs_worst_percent,
        "relative_value_score": entry.relative_value_score,
    })
}

fn statistics_json(model: &str, stats: &PriceStatistics) -> Value {
    json!({
        "gpu_model": model,
        "count": stats.count,
        "mean": render::number(stats.mean, 4),
        "min": render::number(stats.min, 4),
        "max": render::number(stats.max, 4),
        "std_dev": stats.std_dev,
        "volatility_percent": stats.volatility_percent,
    })
}

fn anomaly_json(anomaly: &PriceAnomaly) -> Value {
    let price = &anomaly.price;
    json!({
        "gpu_model": price.gpu_model().as_str(),
        "provider": price.provider().as_str(),
        "region": price.region(),
        "price_per_hour": render::number(price.price_per_hour(), 4),
        "deviation_from_mean": anomaly.deviation_from_mean,
        "deviation_std_devs": anomaly.deviation_std_devs,
    })
}

fn comparison_json(comparison: &ProviderComparison) -> Value {
    let side = |price: &NormalizedPrice| {
        json!({
            "provider": price.provider().as_str(),
            "region": price.region(),
            "price_per_hour": render::number(price.price_per_hour(), 4),
            "cost_performance_score": price.cost_performance_score(),
        })
    };
    json!({
        "gpu_model": comparison.gpu_model.as_str(),
        "providers_compared": comparison.providers_compared,
        "best": side(&comparison.best),
        "worst": side(&comparison.worst),
        "price_difference": render::number(comparison.price_difference, 4),
        "price_difference_percent": render::number(comparison.price_difference_percent, 2),
    })
}

/// Offers far from their own model's mean, grouped by model.
fn anomalies_by_model(prices: &[NormalizedPrice], threshold: f64) -> Vec<PriceAnomaly> {
    let mut by_model: BTreeMap<&str, Vec<NormalizedPrice>> = BTreeMap::new();
    for price in prices {
        by_model
            .entry(price.gpu_model().as_str())
            .or_default()
            .push(price.clone());
    }
    by_model
        .values()
        .flat_map(|group| price_anomalies(group, threshold))
        .collect()
}

/// Current price spread per GPU model.
fn statistics_by_model(prices: &[NormalizedPrice]) -> Vec<(String, PriceStatistics)> {
    let mut by_model: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for price in prices {
        by_model
            .entry(price.gpu_model().as_str())
            .or_default()
            .push(price.price_per_hour());
    }
    by_model
        .into_iter()
        .filter_map(|(model, samples)| {
            price_statistics(&samples).map(|stats| (model.to_string(), stats))
        })
        .collect()
}

/// Execute `values`.
#[allow(clippy::result_large_err)]
pub fn execute(args: &ValuesArgs) -> Result<()> {
    let mut config = context::load_config(&args.config)?;
    if let Some(precision) = args.precision {
        config.ranking.precision = precision;
    }
    let engine = config.engine()?;
    let batch = context::load_batch(&args.file)?;
    let normalization = engine.normalize_source(&batch);

    let mut prices = normalization.prices;
    let mut comparison = None;
    if let Some(model) = &args.model {
        let model = engine.canonical_model(model)?;
        prices.retain(|p| p.gpu_model() == &model);
        comparison = compare_providers(&prices, model.as_str());
    }
    let anomalies = anomalies_by_model(&prices, args.anomaly_threshold);

    let mut ranking = rank_by_value(&prices);
    if let Some(top) = args.top.or(engine.config().top) {
        ranking.truncate(top);
    }
    let statistics = statistics_by_model(&prices);

    if output::is_json() {
        output::json_output(json!({
            "command": "values",
            "precision": engine.config().precision,
            "values": ranking.iter().map(value_json).collect::<Vec<_>>(),
            "price_statistics": statistics
                .iter()
                .map(|(model, stats)| statistics_json(model, stats))
                .collect::<Vec<_>>(),
            "comparison": comparison.as_ref().map(comparison_json),
            "anomaly_threshold": args.anomaly_threshold,
            "anomalies": anomalies.iter().map(anomaly_json).collect::<Vec<_>>(),
            "data_quality": render::quality_json(&normalization.report),
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Input", args.file.display());
    output::field("Precision", engine.config().precision);
    render::print_quality(&normalization.report);

    output::section("Value Ranking");
    if ranking.is_empty() {
        output::note("No priced offers");
        return Ok(());
    }
    let rows: Vec<_> = ranking.iter().map(ValueRow::new).collect();
    output::table(&Table::new(rows).with(Style::rounded()).to_string());

    output::section("Price Spread");
    let rows: Vec<_> = statistics
        .iter()
        .map(|(model, stats)| StatisticsRow {
            gpu: model.clone(),
            count: stats.count,
            min: render::hourly(stats.min),
            mean: render::hourly(stats.mean),
            max: render::hourly(stats.max),
            volatility: format!("{:.1}%", stats.volatility_percent),
        })
        .collect();
    output::table(&Table::new(rows).with(Style::rounded()).to_string());

    if let Some(comparison) = &comparison {
        output::section("Provider Comparison");
        output::field(
            "Best",
            format!(
                "{} at {}",
                comparison.best.provider(),
                output::positive(render::hourly(comparison.best.price_per_hour()))
            ),
        );
        output::field(
            "Worst",
            format!(
                "{} at {}",
                comparison.worst.provider(),
                render::hourly(comparison.worst.price_per_hour())
            ),
        );
        output::field(
            "Compared",
            format!(
                "{} offers, {}% price difference",
                comparison.providers_compared,
                comparison.price_difference_percent.round_dp(1)
            ),
        );
    }

    output::section("Price Anomalies");
    if anomalies.is_empty() {
        output::note(&format!(
            "No offer is more than {} standard deviations from its model's mean",
            args.anomaly_threshold
        ));
        return Ok(());
    }
    let rows: Vec<_> = anomalies.iter().map(AnomalyRow::new).collect();
    output::table(&Table::new(rows).with(Style::rounded()).to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Engine;
    use crate::domain::PriceRecord;
    use rust_decimal_macros::dec;

    #[test]
    fn statistics_group_by_canonical_model() {
        let engine = Engine::with_defaults();
        let normalization = engine.normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(4.00), 0.9),
            PriceRecord::new("GCP", "a100-80gb", "us-central1", dec!(2.00), 0.9),
            PriceRecord::new("Vast", "V100", "", dec!(0.50), 0.7),
        ]);

        let stats = statistics_by_model(&normalization.prices);

        assert_eq!(stats.len(), 2);
        let (model, a100) = &stats[0];
        assert_eq!(model, "A100");
        assert_eq!(a100.count, 2);
        assert_eq!(a100.mean, dec!(3.00));
    }

    #[test]
    fn anomalies_are_judged_within_each_model() {
        let engine = Engine::with_defaults();
        let normalization = engine.normalize(&[
            PriceRecord::new("A", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("B", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("C", "T4", "us", dec!(1), 0.9),
            PriceRecord::new("D", "T4", "us", dec!(9), 0.9),
            PriceRecord::new("AWS", "H100", "us", dec!(12.29), 0.9),
            PriceRecord::new("GCP", "H100", "us", dec!(11.06), 0.9),
        ]);

        let anomalies = anomalies_by_model(&normalization.prices, 1.0);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].price.provider().as_str(), "D");
        assert_eq!(anomaly_json(&anomalies[0])["gpu_model"], "T4");
    }

    #[test]
    fn value_json_carries_scores() {
        let engine = Engine::with_defaults();
        let normalization = engine.normalize(&[
            PriceRecord::new("AWS", "A100", "us-east-1", dec!(4.00), 0.9),
            PriceRecord::new("GCP", "A100", "us-central1", dec!(2.00), 0.9),
        ]);
        let ranking = rank_by_value(&normalization.prices);
        let value = value_json(&ranking[0]);

        assert_eq!(value["value_rank"], 1);
        assert_eq!(value["provider"], "GCP");
        assert_eq!(value["precision"], "fp32");
    }
}
