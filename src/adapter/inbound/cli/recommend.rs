//! Handler for the `recommend` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::RecommendArgs;
use crate::adapter::inbound::cli::{context, output, render};
use crate::error::Result;

/// Execute `recommend`.
#[allow(clippy::result_large_err)]
pub fn execute(args: &RecommendArgs) -> Result<()> {
    let engine = context::detect_engine(&args.detect, Some(&args.usage))?;
    let batch = context::load_batch(&args.file)?;
    let analysis = engine.analyze_batch(&batch);
    let scenario = engine.config().scenario;

    if output::is_json() {
        output::json_output(json!({
            "command": "recommend",
            "scenario": render::scenario_json(&scenario),
            "recommendations": analysis
                .recommendations
                .iter()
                .map(render::recommendation_json)
                .collect::<Vec<_>>(),
            "data_quality": render::quality_json(&analysis.report),
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Input", args.file.display());
    output::field(
        "Scenario",
        format!(
            "{} GPU(s) x {} day(s) x {} h/day",
            scenario.unit_count(),
            scenario.duration_days(),
            scenario.hours_per_day().normalize()
        ),
    );
    output::field("Hours", scenario.total_hours().normalize());
    render::print_quality(&analysis.report);

    output::section("Recommendations");
    if analysis.recommendations.is_empty() {
        output::note("No opportunities above the configured thresholds");
        return Ok(());
    }
    output::table(&render::recommendation_table(&analysis.recommendations));

    let best = &analysis.recommendations[0];
    output::success(&format!(
        "Best: rent {} from {} and save {} over the scenario",
        best.opportunity().gpu_model(),
        best.opportunity().cheapest().provider(),
        output::positive(render::usd(best.total_savings()))
    ));
    Ok(())
}
