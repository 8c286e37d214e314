//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all engine settings.
//! Every section is optional; an empty file yields the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use gpuarb::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     let engine = config.engine()?;
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::application::{ConfidenceWeights, DetectorConfig, Engine, EngineConfig, SortMode};
use crate::domain::error::DomainError;
use crate::domain::{
    GpuSpec, Hours, Precision, ReliabilityPriors, SpecTable, Throughput, UsageScenario,
    DEFAULT_RELIABILITY,
};
use crate::error::{ConfigError, Result};

/// Tolerance when checking that confidence weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Confidence weights plus reliability priors.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub weights: ConfidenceWeights,

    /// Prior for providers without an entry in `reliability`
    #[serde(default = "default_reliability")]
    pub default_reliability: f64,

    /// Per-provider prior overrides, layered over the built-in table
    #[serde(default)]
    pub reliability: BTreeMap<String, f64>,
}

const fn default_reliability() -> f64 {
    DEFAULT_RELIABILITY
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: ConfidenceWeights::default(),
            default_reliability: default_reliability(),
            reliability: BTreeMap::new(),
        }
    }
}

/// Usage scenario used to project absolute costs.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    #[serde(default = "default_unit_count")]
    pub unit_count: u32,

    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Hours,
}

const fn default_unit_count() -> u32 {
    1
}

const fn default_duration_days() -> u32 {
    30
}

fn default_hours_per_day() -> Hours {
    Decimal::from(24)
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            unit_count: default_unit_count(),
            duration_days: default_duration_days(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

/// Scoring precision and output ordering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub precision: Precision,

    #[serde(default)]
    pub sort: SortMode,

    /// Keep only this many recommendations
    #[serde(default)]
    pub top: Option<usize>,
}

/// An extra (or replacement) spec-table entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GpuSpecConfig {
    pub model: String,
    pub fp32: f64,
    /// Defaults to `fp32` when omitted
    #[serde(default)]
    pub fp16: Option<f64>,
    /// Defaults to `fp16` when omitted
    #[serde(default)]
    pub tensor: Option<f64>,
    #[serde(default)]
    pub memory_gb: u32,
    #[serde(default = "default_architecture")]
    pub architecture: String,
}

fn default_architecture() -> String {
    "Unknown".to_string()
}

impl GpuSpecConfig {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSpec`] for unusable entries.
    pub fn to_spec(&self) -> std::result::Result<GpuSpec, DomainError> {
        let fp16 = self.fp16.unwrap_or(self.fp32);
        let tensor = self.tensor.unwrap_or(fp16);
        GpuSpec::try_new(
            self.model.as_str(),
            Throughput::new(self.fp32, fp16, tensor),
            self.memory_gb,
            self.architecture.as_str(),
        )
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Opportunity thresholds.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Confidence weights and reliability priors.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Default usage scenario for recommendations.
    #[serde(default)]
    pub usage: UsageConfig,

    /// Precision, sort order and result limit.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Extra model aliases, alias to target model.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Extra spec-table entries. An entry named like a built-in replaces it.
    #[serde(default)]
    pub gpu_specs: Vec<GpuSpecConfig>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., a savings threshold outside `[0, 100)`)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that all values are within acceptable ranges and that custom
    /// specs and aliases build a consistent table.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let detector = &self.detector;
        if detector.min_percentage_savings < Decimal::ZERO
            || detector.min_percentage_savings >= Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::InvalidValue {
                field: "min_percentage_savings",
                reason: "must be within [0, 100)".to_string(),
            }
            .into());
        }
        if detector.min_price_difference < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_price_difference",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if detector.min_providers < 2 {
            return Err(ConfigError::InvalidValue {
                field: "min_providers",
                reason: "must be at least 2".to_string(),
            }
            .into());
        }

        let weights = &self.classifier.weights;
        if [weights.availability, weights.reliability, weights.density]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigError::InvalidValue {
                field: "classifier_weights",
                reason: "weights must be non-negative".to_string(),
            }
            .into());
        }
        if (weights.total() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidValue {
                field: "classifier_weights",
                reason: format!("weights must sum to 1, got {}", weights.total()),
            }
            .into());
        }
        if !(weights.density_saturation.is_finite() && weights.density_saturation > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "density_saturation",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.classifier.default_reliability) {
            return Err(ConfigError::InvalidValue {
                field: "default_reliability",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if let Some((provider, prior)) = self
            .classifier
            .reliability
            .iter()
            .find(|(_, prior)| !(0.0..=1.0).contains(*prior))
        {
            return Err(ConfigError::InvalidValue {
                field: "reliability",
                reason: format!("prior for '{provider}' must be between 0 and 1, got {prior}"),
            }
            .into());
        }

        if self.ranking.top == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "top",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        self.usage_scenario()?;
        self.spec_table()?;
        Ok(())
    }

    /// The built-in spec table extended with configured entries and aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unusable entry or an
    /// alias whose target is missing.
    #[allow(clippy::result_large_err)]
    pub fn spec_table(&self) -> Result<SpecTable> {
        let mut table = SpecTable::builtin();
        for entry in &self.gpu_specs {
            let spec = entry.to_spec().map_err(|e| ConfigError::InvalidValue {
                field: "gpu_specs",
                reason: e.to_string(),
            })?;
            table.insert(spec);
        }
        for (alias, target) in &self.aliases {
            table
                .add_alias(alias, target)
                .map_err(|e| ConfigError::InvalidValue {
                    field: "aliases",
                    reason: e.to_string(),
                })?;
        }
        Ok(table)
    }

    /// Built-in priors with configured overrides.
    #[must_use]
    pub fn reliability_priors(&self) -> ReliabilityPriors {
        let mut priors =
            ReliabilityPriors::builtin().with_default(self.classifier.default_reliability);
        for (provider, prior) in &self.classifier.reliability {
            priors.set(provider, *prior);
        }
        priors
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    #[allow(clippy::result_large_err)]
    pub fn usage_scenario(&self) -> Result<UsageScenario> {
        let usage = &self.usage;
        UsageScenario::try_new(usage.unit_count, usage.duration_days, usage.hours_per_day)
            .map_err(|e| match e {
                DomainError::InvalidUsage { field, reason } => {
                    ConfigError::InvalidValue { field, reason }.into()
                }
                other => other.into(),
            })
    }

    /// # Errors
    ///
    /// Returns an error if the usage scenario is invalid.
    #[allow(clippy::result_large_err)]
    pub fn engine_config(&self) -> Result<EngineConfig> {
        Ok(EngineConfig {
            precision: self.ranking.precision,
            detector: self.detector.clone(),
            weights: self.classifier.weights,
            scenario: self.usage_scenario()?,
            sort: self.ranking.sort,
            top: self.ranking.top,
        })
    }

    /// Validate and build an engine from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    #[allow(clippy::result_large_err)]
    pub fn engine(&self) -> Result<Engine> {
        self.validate()?;
        Ok(Engine::new(
            self.spec_table()?,
            self.reliability_priors(),
            self.engine_config()?,
        ))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderId;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.detector, DetectorConfig::default());
        assert_eq!(config.classifier.weights, ConfidenceWeights::default());
        assert_eq!(config.usage_scenario().unwrap(), UsageScenario::default());
        assert_eq!(config.ranking.sort, SortMode::Savings);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
[logging]
level = "debug"
format = "json"

[detector]
min_percentage_savings = 25
min_price_difference = 0.5
min_providers = 3

[classifier]
default_reliability = 0.4

[classifier.weights]
availability = 0.5
density = 0.1

[classifier.reliability]
"Acme Cloud" = 0.85

[usage]
unit_count = 8
duration_days = 7
hours_per_day = 12

[ranking]
precision = "fp16"
sort = "confidence"
top = 5

[aliases]
"H100 NVL" = "H100"

[[gpu_specs]]
model = "B200"
fp32 = 80.0
fp16 = 2250.0
memory_gb = 192
architecture = "Blackwell"
"#;
        let config = Config::parse_toml(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.detector.min_percentage_savings, dec!(25));
        assert_eq!(config.detector.min_price_difference, dec!(0.5));
        assert_eq!(config.detector.min_providers, 3);
        assert_eq!(config.ranking.precision, Precision::Fp16);
        assert_eq!(config.ranking.sort, SortMode::Confidence);
        assert_eq!(config.ranking.top, Some(5));

        let scenario = config.usage_scenario().unwrap();
        assert_eq!(scenario.total_hours(), dec!(672));

        let priors = config.reliability_priors();
        assert!((priors.prior_for(&ProviderId::new("acme-cloud")) - 0.85).abs() < 1e-9);
        assert!((priors.default_prior() - 0.4).abs() < 1e-9);

        let table = config.spec_table().unwrap();
        assert_eq!(table.lookup("b200").unwrap().architecture(), "Blackwell");
        assert_eq!(table.lookup("H100-NVL").unwrap().model(), "H100");
    }

    #[test]
    fn rejects_savings_threshold_out_of_range() {
        let result = Config::parse_toml("[detector]\nmin_percentage_savings = 100\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "min_percentage_savings",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_negative_price_difference() {
        let result = Config::parse_toml("[detector]\nmin_price_difference = -1\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "min_price_difference",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_single_provider_minimum() {
        let result = Config::parse_toml("[detector]\nmin_providers = 1\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "min_providers",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let result = Config::parse_toml("[classifier.weights]\navailability = 0.5\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "classifier_weights",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_out_of_range_prior() {
        let result = Config::parse_toml("[classifier.reliability]\naws = 1.5\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "reliability",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_invalid_usage() {
        let result = Config::parse_toml("[usage]\nhours_per_day = 30\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "hours_per_day",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_zero_top() {
        let result = Config::parse_toml("[ranking]\ntop = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "top", .. }))
        ));
    }

    #[test]
    fn rejects_dangling_alias() {
        let result = Config::parse_toml("[aliases]\n\"X9000\" = \"Z1\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "aliases",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_unknown_sort_mode() {
        let result = Config::parse_toml("[ranking]\nsort = \"latency\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn engine_uses_configured_thresholds() {
        let config = Config::parse_toml("[detector]\nmin_percentage_savings = 50\n").unwrap();
        let engine = config.engine().unwrap();
        assert_eq!(
            engine.config().detector.min_percentage_savings,
            dec!(50)
        );
    }
}
