//! JSON views and terminal tables for engine results.
//!
//! Presentation only: every number shown here was computed by the engine.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output;
use crate::domain::{
    DataQualityReport, NormalizedPrice, QualitySummary, Recommendation, RiskTier, UsageScenario,
};

/// Decimal as a JSON number rounded to `dp` places.
pub fn number(value: Decimal, dp: u32) -> Value {
    json!(value.round_dp(dp).to_f64().unwrap_or(0.0))
}

fn ratio(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn offer_json(offer: &NormalizedPrice) -> Value {
    json!({
        "provider": offer.provider().as_str(),
        "region": offer.region(),
        "price_per_hour": number(offer.price_per_hour(), 4),
        "availability": offer.availability(),
    })
}

/// One opportunity with its confidence and risk.
pub fn opportunity_json(rec: &Recommendation) -> Value {
    let opp = rec.opportunity();
    json!({
        "gpu_model": opp.gpu_model().as_str(),
        "cheapest_provider": offer_json(opp.cheapest()),
        "most_expensive_provider": offer_json(opp.most_expensive()),
        "percentage_savings": number(opp.percentage_savings(), 2),
        "price_difference_usd_per_hour": number(opp.price_difference_per_hour(), 4),
        "annual_savings_usd": number(opp.annual_savings_usd(), 2),
        "monthly_savings_usd": number(opp.monthly_savings_usd(), 2),
        "providers_offering": opp.providers_offering(),
        "confidence": ratio(rec.assessment().confidence()),
        "risk_tier": rec.assessment().risk_tier(),
    })
}

/// An opportunity plus its usage-scaled totals.
pub fn recommendation_json(rec: &Recommendation) -> Value {
    let mut value = opportunity_json(rec);
    if let Value::Object(map) = &mut value {
        map.insert("total_hours".into(), number(rec.total_hours(), 2));
        map.insert("total_cost".into(), number(rec.total_cost(), 2));
        map.insert("total_savings".into(), number(rec.total_savings(), 2));
        map.insert("monthly_cost".into(), number(rec.monthly_cost(), 2));
        map.insert("monthly_savings".into(), number(rec.monthly_savings(), 2));
    }
    value
}

pub fn scenario_json(scenario: &UsageScenario) -> Value {
    json!({
        "unit_count": scenario.unit_count(),
        "duration_days": scenario.duration_days(),
        "hours_per_day": number(scenario.hours_per_day(), 2),
        "total_hours": number(scenario.total_hours(), 2),
    })
}

pub fn quality_json(report: &DataQualityReport) -> Value {
    let issues: Vec<Value> = report
        .issues()
        .iter()
        .map(|issue| {
            json!({
                "index": issue.index,
                "error": issue.error.to_string(),
            })
        })
        .collect();
    let mut value = json!(QualitySummary::from(report));
    value["issues"] = Value::Array(issues);
    value
}

/// Risk tier coloured by severity.
pub fn risk(tier: RiskTier) -> String {
    match tier {
        RiskTier::Low => output::positive(tier),
        RiskTier::Medium => output::caution(tier),
        RiskTier::High => output::negative(tier),
    }
}

/// USD amount with two decimals.
pub fn usd(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// Hourly USD price with up to four decimals.
pub fn hourly(value: Decimal) -> String {
    format!("${}/h", value.round_dp(4).normalize())
}

fn offer_label(offer: &NormalizedPrice) -> String {
    if offer.region().is_empty() {
        offer.provider().to_string()
    } else {
        format!("{} ({})", offer.provider(), offer.region())
    }
}

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Cheapest")]
    cheapest: String,
    #[tabled(rename = "Price")]
    cheapest_price: String,
    #[tabled(rename = "Most Expensive")]
    dearest: String,
    #[tabled(rename = "Price")]
    dearest_price: String,
    #[tabled(rename = "Savings")]
    savings: String,
    #[tabled(rename = "Annual")]
    annual: String,
    #[tabled(rename = "Providers")]
    providers: usize,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

impl OpportunityRow {
    fn new(rec: &Recommendation) -> Self {
        let opp = rec.opportunity();
        Self {
            gpu: opp.gpu_model().to_string(),
            cheapest: offer_label(opp.cheapest()),
            cheapest_price: hourly(opp.cheapest().price_per_hour()),
            dearest: offer_label(opp.most_expensive()),
            dearest_price: hourly(opp.most_expensive().price_per_hour()),
            savings: output::positive(format!("{:.1}%", opp.percentage_savings())),
            annual: usd(opp.annual_savings_usd()),
            providers: opp.providers_offering(),
            confidence: format!("{:.0}%", rec.assessment().confidence() * 100.0),
            risk: risk(rec.assessment().risk_tier()),
        }
    }
}

/// Table of opportunities.
pub fn opportunity_table(recommendations: &[Recommendation]) -> String {
    let rows: Vec<_> = recommendations.iter().map(OpportunityRow::new).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Use")]
    provider: String,
    #[tabled(rename = "Instead Of")]
    instead_of: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Total Cost")]
    total_cost: String,
    #[tabled(rename = "Total Savings")]
    total_savings: String,
    #[tabled(rename = "Monthly Savings")]
    monthly_savings: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

impl RecommendationRow {
    fn new(rec: &Recommendation) -> Self {
        let opp = rec.opportunity();
        Self {
            gpu: opp.gpu_model().to_string(),
            provider: offer_label(opp.cheapest()),
            instead_of: offer_label(opp.most_expensive()),
            hours: rec.total_hours().normalize().to_string(),
            total_cost: usd(rec.total_cost()),
            total_savings: output::positive(usd(rec.total_savings())),
            monthly_savings: usd(rec.monthly_savings()),
            risk: risk(rec.assessment().risk_tier()),
        }
    }
}

/// Table of usage-scaled recommendations.
pub fn recommendation_table(recommendations: &[Recommendation]) -> String {
    let rows: Vec<_> = recommendations.iter().map(RecommendationRow::new).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Summarize dropped records; list each one at `-v`.
pub fn print_quality(report: &DataQualityReport) {
    if report.is_clean() {
        return;
    }
    output::warning(&format!(
        "{} record(s) excluded: {} unknown model, {} invalid",
        report.total_dropped(),
        report.unknown_models(),
        report.invalid_records()
    ));
    if output::verbosity() > 0 {
        for issue in report.issues() {
            output::note(&format!("#{}: {}", issue.index, issue.error));
        }
    }
}
