//! Handler for the `providers` command.

use std::collections::BTreeSet;

use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ProvidersArgs;
use crate::adapter::inbound::cli::{context, output, render};
use crate::application::analytics::{
    cross_region_spread, provider_reliability, ProviderReliability, RegionSpread,
};
use crate::domain::{NormalizedPrice, ReliabilityPriors};
use crate::error::Result;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Offers")]
    samples: usize,
    #[tabled(rename = "Avg Avail")]
    average: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Consistency")]
    consistency: String,
    #[tabled(rename = "Prior")]
    prior: String,
}

#[derive(Tabled)]
struct SpreadRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Cheapest Region")]
    cheapest: String,
    #[tabled(rename = "Most Expensive Region")]
    dearest: String,
    #[tabled(rename = "Difference")]
    difference: String,
    #[tabled(rename = "Savings")]
    savings: String,
}

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

fn prior_label(priors: &ReliabilityPriors, summary: &ProviderReliability) -> String {
    let prior = percent(priors.prior_for(&summary.provider));
    if priors.is_known(&summary.provider) {
        prior
    } else {
        output::muted(format!("{prior} (default)"))
    }
}

/// Region spreads for every provider and model offered in more than one region.
fn region_spreads(prices: &[NormalizedPrice]) -> Vec<RegionSpread> {
    let pairs: BTreeSet<(String, String)> = prices
        .iter()
        .map(|p| (p.provider().lookup_key(), p.gpu_model().to_string()))
        .collect();
    pairs
        .iter()
        .filter_map(|(provider, model)| cross_region_spread(prices, provider, model))
        .collect()
}

fn provider_json(priors: &ReliabilityPriors, summary: &ProviderReliability) -> Value {
    json!({
        "provider": summary.provider.as_str(),
        "sample_count": summary.sample_count,
        "avg_availability": summary.avg_availability,
        "min_availability": summary.min_availability,
        "max_availability": summary.max_availability,
        "consistency": summary.consistency,
        "reliability_prior": priors.prior_for(&summary.provider),
        "prior_is_default": !priors.is_known(&summary.provider),
    })
}

fn spread_json(spread: &RegionSpread) -> Value {
    json!({
        "provider": spread.provider.as_str(),
        "gpu_model": spread.gpu_model.as_str(),
        "cheapest_region": spread.cheapest_region,
        "cheapest_price": render::number(spread.cheapest_price, 4),
        "most_expensive_region": spread.most_expensive_region,
        "most_expensive_price": render::number(spread.most_expensive_price, 4),
        "price_difference": render::number(spread.price_difference, 4),
        "percentage_savings": render::number(spread.percentage_savings, 2),
    })
}

/// Execute `providers`.
#[allow(clippy::result_large_err)]
pub fn execute(args: &ProvidersArgs) -> Result<()> {
    let config = context::load_config(&args.config)?;
    let engine = config.engine()?;
    let batch = context::load_batch(&args.file)?;
    let priors = engine.priors();

    let summaries = provider_reliability(batch.records());
    let normalization = engine.normalize_source(&batch);
    let spreads = region_spreads(&normalization.prices);

    if output::is_json() {
        output::json_output(json!({
            "command": "providers",
            "providers": summaries
                .iter()
                .map(|s| provider_json(priors, s))
                .collect::<Vec<_>>(),
            "region_spreads": spreads.iter().map(spread_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Input", args.file.display());

    output::section("Observed Availability");
    if summaries.is_empty() {
        output::note("No price records");
        return Ok(());
    }
    let rows: Vec<_> = summaries
        .iter()
        .map(|s| ProviderRow {
            provider: s.provider.to_string(),
            samples: s.sample_count,
            average: percent(s.avg_availability),
            min: percent(s.min_availability),
            max: percent(s.max_availability),
            consistency: format!("{:.2}", s.consistency),
            prior: prior_label(priors, s),
        })
        .collect();
    output::table(&Table::new(rows).with(Style::rounded()).to_string());

    if !spreads.is_empty() {
        output::section("Cross-Region Spread");
        let rows: Vec<_> = spreads
            .iter()
            .map(|s| SpreadRow {
                provider: s.provider.to_string(),
                gpu: s.gpu_model.to_string(),
                cheapest: format!("{} {}", s.cheapest_region, render::hourly(s.cheapest_price)),
                dearest: format!(
                    "{} {}",
                    s.most_expensive_region,
                    render::hourly(s.most_expensive_price)
                ),
                difference: render::hourly(s.price_difference),
                savings: output::positive(format!("{:.1}%", s.percentage_savings)),
            })
            .collect();
        output::table(&Table::new(rows).with(Style::rounded()).to_string());
    }
    output::hint("priors feed confidence; override them under [classifier.reliability]");
    Ok(())
}
