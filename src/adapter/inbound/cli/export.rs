//! Handler for the `export` command.

use std::fs::File;
use std::io::{self, BufWriter};

use serde_json::json;
use tracing::info;

use crate::adapter::inbound::cli::command::ExportArgs;
use crate::adapter::inbound::cli::{context, output};
use crate::adapter::outbound::csv::CsvExporter;
use crate::error::Result;
use crate::port::ReportExporter;

/// Execute `export`.
///
/// Without `--output` the CSV goes to stdout and nothing else is printed
/// there.
#[allow(clippy::result_large_err)]
pub fn execute(args: &ExportArgs) -> Result<()> {
    let engine = context::detect_engine(&args.detect, Some(&args.usage))?;
    let batch = context::load_batch(&args.file)?;
    let analysis = engine.analyze_batch(&batch);
    let exporter = CsvExporter::new();

    let Some(path) = &args.output else {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        return exporter.export(&analysis.recommendations, &mut writer);
    };

    let mut writer = BufWriter::new(File::create(path)?);
    exporter.export(&analysis.recommendations, &mut writer)?;
    info!(
        path = %path.display(),
        rows = analysis.recommendations.len(),
        "Exported recommendations"
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "export",
            "path": path.display().to_string(),
            "rows": analysis.recommendations.len(),
            "records_excluded": analysis.report.total_dropped(),
        }));
        return Ok(());
    }

    output::success(&format!(
        "Wrote {} recommendation(s)",
        analysis.recommendations.len()
    ));
    output::field("Path", path.display());
    Ok(())
}
