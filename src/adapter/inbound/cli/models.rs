//! Handler for the `models` command.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ConfigOptionArg;
use crate::adapter::inbound::cli::{context, output};
use crate::domain::{GpuSpec, PerformanceTier};
use crate::error::Result;

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Architecture")]
    architecture: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "FP32")]
    fp32: String,
    #[tabled(rename = "FP16")]
    fp16: String,
    #[tabled(rename = "Tensor")]
    tensor: String,
    #[tabled(rename = "Tier")]
    tier: String,
}

fn tier(tier: PerformanceTier) -> String {
    match tier {
        PerformanceTier::HighEnd => output::positive(tier),
        PerformanceTier::MidRange => output::highlight(tier),
        PerformanceTier::Entry => output::muted(tier),
    }
}

impl ModelRow {
    fn new(spec: &GpuSpec) -> Self {
        let throughput = spec.throughput();
        Self {
            model: spec.model().to_string(),
            architecture: spec.architecture().to_string(),
            memory: format!("{} GB", spec.memory_gb()),
            fp32: format!("{:.1}", throughput.fp32),
            fp16: format!("{:.1}", throughput.fp16),
            tensor: format!("{:.1}", throughput.tensor),
            tier: tier(spec.tier()),
        }
    }
}

/// Execute `models`.
#[allow(clippy::result_large_err)]
pub fn execute(args: &ConfigOptionArg) -> Result<()> {
    let config = context::load_config(args)?;
    let table = config.spec_table()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "models",
            "models": table
                .iter()
                .map(|spec| json!({
                    "model": spec.model(),
                    "architecture": spec.architecture(),
                    "memory_gb": spec.memory_gb(),
                    "throughput_tflops": spec.throughput(),
                    "tier": spec.tier(),
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("GPU Spec Table");
    let rows: Vec<_> = table.iter().map(ModelRow::new).collect();
    output::table(&Table::new(rows).with(Style::rounded()).to_string());
    output::note("Throughput in TFLOPS. Add or replace entries with [[gpu_specs]].");
    Ok(())
}
