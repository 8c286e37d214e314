use std::fs;
use std::path::PathBuf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use gpuarb::domain::PriceRecord;

pub fn record(provider: &str, model: &str, price: Decimal, availability: f64) -> PriceRecord {
    PriceRecord::new(provider, model, "", price, availability)
}

/// AWS vs LambdaLabs A100.
pub fn a100_pair() -> Vec<PriceRecord> {
    vec![
        PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
        PriceRecord::new("LambdaLabs", "A100", "us-west-1", dec!(1.10), 0.55),
    ]
}

/// A mixed market with several models, spellings and one bad record.
pub fn market() -> Vec<PriceRecord> {
    vec![
        PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
        PriceRecord::new("LambdaLabs", "A100-80GB", "us-west-1", dec!(1.10), 0.55),
        PriceRecord::new("GCP", "NVIDIA A100", "us-central1", dec!(3.67), 0.95),
        PriceRecord::new("RunPod", "A100-40GB", "", dec!(1.19), 0.70),
        PriceRecord::new("AWS", "V100", "us-east-1", dec!(3.06), 0.95),
        PriceRecord::new("Azure", "V100", "eastus", dec!(3.06), 0.90),
        PriceRecord::new("Vast", "V100", "", dec!(0.89), 0.60),
        PriceRecord::new("CoreWeave", "H100", "us-east", dec!(4.25), 0.85),
        PriceRecord::new("Vast", "H100", "", dec!(2.40), 0.65),
        PriceRecord::new("AWS", "T4", "us-east-1", dec!(0.53), 0.98),
        PriceRecord::new("Oracle", "B9000", "", dec!(9.99), 0.90),
        PriceRecord::new("GCP", "T4", "us-central1", dec!(0.0), 0.95),
    ]
}

/// JSON document with the Scenario 1 pair.
pub const A100_PAIR_JSON: &str = r#"[
  {"provider": "AWS", "gpu_model": "A100", "region": "us-east-1",
   "price_per_hour": 32.77, "availability": 0.92},
  {"provider": "LambdaLabs", "gpu_model": "A100", "region": "us-west-1",
   "price_per_hour": 1.10, "availability": 0.55}
]"#;

/// Temporary directory holding one file.
pub struct TempFile {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn write_temp(name: &str, contents: &str) -> TempFile {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    TempFile { _dir: dir, path }
}
