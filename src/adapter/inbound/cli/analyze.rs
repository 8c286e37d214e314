//! Handler for the `analyze` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::AnalyzeArgs;
use crate::adapter::inbound::cli::{context, output, render};
use crate::error::Result;

/// Execute `analyze`.
#[allow(clippy::result_large_err)]
pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let engine = context::detect_engine(&args.detect, None)?;
    let batch = context::load_batch(&args.file)?;
    let analysis = match &args.model {
        Some(model) => engine.analyze_model(&batch, model)?,
        None => engine.analyze_batch(&batch),
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "analyze",
            "records_seen": analysis.records_seen,
            "records_normalized": analysis.records_normalized,
            "sort": engine.config().sort,
            "model": args.model,
            "opportunities": analysis
                .recommendations
                .iter()
                .map(render::opportunity_json)
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
        "Records",
        format!(
            "{} read, {} priced",
            analysis.records_seen, analysis.records_normalized
        ),
    );
    output::field("Sort", engine.config().sort);
    if let Some(model) = &args.model {
        output::field("Model", model);
    }
    render::print_quality(&analysis.report);

    output::section("Opportunities");
    if analysis.recommendations.is_empty() {
        output::note("No opportunities above the configured thresholds");
        return Ok(());
    }
    output::table(&render::opportunity_table(&analysis.recommendations));
    output::hint(&format!(
        "run {} to project costs over a usage scenario",
        output::highlight(format!("gpuarb recommend {}", args.file.display()))
    ));
    Ok(())
}
