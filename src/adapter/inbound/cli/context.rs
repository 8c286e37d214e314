//! Shared setup for analysis commands: configuration, overrides, input.

use std::path::Path;

use tracing::debug;

use super::command::{ConfigOptionArg, DetectArgs, UsageArgs};
use super::{output, paths};
use crate::adapter::outbound::file::JsonFileSource;
use crate::application::Engine;
use crate::infrastructure::config::settings::Config;
use crate::error::Result;
use crate::port::{PriceSource, SourceBatch};

/// Load the configuration a command should run with and start logging.
///
/// An explicit `-c` path must exist. Without one, the default path is used
/// when present and built-in defaults otherwise.
#[allow(clippy::result_large_err)]
pub fn load_config(arg: &ConfigOptionArg) -> Result<Config> {
    let config = match &arg.config {
        Some(path) => Config::load(path)?,
        None => {
            let path = paths::default_config();
            if path.is_file() {
                Config::load(&path)?
            } else {
                Config::default()
            }
        }
    };
    init_logging(&config);
    Ok(config)
}

/// Start logging at the configured level, raised by `-v` flags.
pub fn init_logging(config: &Config) {
    match output::verbosity() {
        0 => config.init_logging(),
        1 => config.logging.with_level("debug").init(),
        _ => config.logging.with_level("trace").init(),
    }
}

/// Layer detection and ranking flags over the loaded configuration.
pub fn apply_detect(config: &mut Config, args: &DetectArgs) {
    if let Some(min_savings) = args.min_savings {
        config.detector.min_percentage_savings = min_savings;
    }
    if let Some(min_difference) = args.min_difference {
        config.detector.min_price_difference = min_difference;
    }
    if let Some(min_providers) = args.min_providers {
        config.detector.min_providers = min_providers;
    }
    if let Some(sort) = args.sort {
        config.ranking.sort = sort;
    }
    if let Some(top) = args.top {
        config.ranking.top = Some(top);
    }
    if let Some(precision) = args.precision {
        config.ranking.precision = precision;
    }
}

/// Layer usage scenario flags over the loaded configuration.
pub fn apply_usage(config: &mut Config, args: &UsageArgs) {
    if let Some(units) = args.units {
        config.usage.unit_count = units;
    }
    if let Some(days) = args.days {
        config.usage.duration_days = days;
    }
    if let Some(hours) = args.hours {
        config.usage.hours_per_day = hours;
    }
}

/// Configuration plus detection flags, validated into an engine.
#[allow(clippy::result_large_err)]
pub fn detect_engine(args: &DetectArgs, usage: Option<&UsageArgs>) -> Result<Engine> {
    let mut config = load_config(&args.config)?;
    apply_detect(&mut config, args);
    if let Some(usage) = usage {
        apply_usage(&mut config, usage);
    }
    config.engine()
}

/// Read a JSON price file.
#[allow(clippy::result_large_err)]
pub fn load_batch(path: &Path) -> Result<SourceBatch> {
    let source = JsonFileSource::new(path);
    debug!(source = %source.describe(), "Reading price records");
    source.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SortMode;
    use crate::domain::Precision;
    use rust_decimal_macros::dec;

    #[test]
    fn detect_flags_override_config() {
        let mut config = Config::default();
        let args = DetectArgs {
            min_savings: Some(dec!(30)),
            min_difference: Some(dec!(0.25)),
            min_providers: Some(3),
            sort: Some(SortMode::Confidence),
            top: Some(2),
            precision: Some(Precision::Tensor),
            ..DetectArgs::default()
        };

        apply_detect(&mut config, &args);

        assert_eq!(config.detector.min_percentage_savings, dec!(30));
        assert_eq!(config.detector.min_price_difference, dec!(0.25));
        assert_eq!(config.detector.min_providers, 3);
        assert_eq!(config.ranking.sort, SortMode::Confidence);
        assert_eq!(config.ranking.top, Some(2));
        assert_eq!(config.ranking.precision, Precision::Tensor);
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = Config::default();
        apply_detect(&mut config, &DetectArgs::default());
        apply_usage(&mut config, &UsageArgs::default());

        assert_eq!(config.detector.min_percentage_savings, dec!(10));
        assert_eq!(config.usage.duration_days, 30);
        assert_eq!(config.ranking.top, None);
    }

    #[test]
    fn usage_flags_override_config() {
        let mut config = Config::default();
        let args = UsageArgs {
            units: Some(4),
            days: Some(10),
            hours: Some(dec!(8)),
        };

        apply_usage(&mut config, &args);

        let scenario = config.usage_scenario().unwrap();
        assert_eq!(scenario.total_hours(), dec!(320));
    }

    #[test]
    fn invalid_override_fails_validation() {
        let mut config = Config::default();
        let args = DetectArgs {
            min_savings: Some(dec!(150)),
            ..DetectArgs::default()
        };
        apply_detect(&mut config, &args);
        assert!(config.engine().is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let arg = ConfigOptionArg {
            config: Some("/nonexistent/gpuarb.toml".into()),
        };
        assert!(load_config(&arg).is_err());
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[detector]\nmin_percentage_savings = 42\n").unwrap();

        let config = load_config(&ConfigOptionArg { config: Some(path) }).unwrap();
        assert_eq!(config.detector.min_percentage_savings, dec!(42));
    }
}
