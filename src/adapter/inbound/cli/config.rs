//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigOptionArg;
use crate::adapter::inbound::cli::{context, output, paths};
use crate::domain::{ProviderId, ReliabilityPriors};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
#[allow(clippy::result_large_err)]
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note(&format!(
        "2. Run: gpuarb config validate -c {}",
        path.display()
    ));
    output::note(&format!(
        "3. Run: gpuarb analyze prices.json -c {}",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
#[allow(clippy::result_large_err)]
pub fn execute_show(arg: &ConfigOptionArg) -> Result<()> {
    let config = context::load_config(arg)?;
    let source = match &arg.config {
        Some(path) => path.display().to_string(),
        None => {
            let path = paths::default_config();
            if path.is_file() {
                path.display().to_string()
            } else {
                "built-in defaults".to_string()
            }
        }
    };
    let scenario = config.usage_scenario()?;
    let weights = &config.classifier.weights;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "source": source,
            "logging": {
                "level": config.logging.level,
                "format": config.logging.format,
            },
            "detector": {
                "min_percentage_savings": config.detector.min_percentage_savings.to_string(),
                "min_price_difference": config.detector.min_price_difference.to_string(),
                "min_providers": config.detector.min_providers,
            },
            "classifier": {
                "weights": {
                    "availability": weights.availability,
                    "reliability": weights.reliability,
                    "density": weights.density,
                    "density_saturation": weights.density_saturation,
                },
                "default_reliability": config.classifier.default_reliability,
                "reliability": config.classifier.reliability,
            },
            "usage": {
                "unit_count": scenario.unit_count(),
                "duration_days": scenario.duration_days(),
                "hours_per_day": scenario.hours_per_day().to_string(),
            },
            "ranking": {
                "precision": config.ranking.precision,
                "sort": config.ranking.sort,
                "top": config.ranking.top,
            },
            "aliases": config.aliases,
            "gpu_specs": config
                .gpu_specs
                .iter()
                .map(|spec| spec.model.as_str())
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Source", source);
    output::field("Log level", &config.logging.level);

    output::section("Detector");
    output::field(
        "Min savings",
        format!("{}%", config.detector.min_percentage_savings),
    );
    output::field(
        "Min diff",
        format!("${}/h", config.detector.min_price_difference),
    );
    output::field("Min providers", config.detector.min_providers);

    output::section("Classifier");
    output::field(
        "Weights",
        format!(
            "availability {:.2}, reliability {:.2}, density {:.2}",
            weights.availability, weights.reliability, weights.density
        ),
    );
    output::field("Saturation", weights.density_saturation);
    output::field("Default prior", config.classifier.default_reliability);
    for (provider, prior) in &config.classifier.reliability {
        output::field(provider, prior);
    }

    output::section("Usage");
    output::field("Units", scenario.unit_count());
    output::field("Days", scenario.duration_days());
    output::field("Hours/day", scenario.hours_per_day().normalize());

    output::section("Ranking");
    output::field("Precision", config.ranking.precision);
    output::field("Sort", config.ranking.sort);
    output::field(
        "Top",
        config
            .ranking
            .top
            .map_or_else(|| "all".to_string(), |top| top.to_string()),
    );

    if !config.aliases.is_empty() || !config.gpu_specs.is_empty() {
        output::section("Spec Table");
        for spec in &config.gpu_specs {
            output::field("Custom", &spec.model);
        }
        for (alias, target) in &config.aliases {
            output::field("Alias", format!("{alias} -> {target}"));
        }
    }

    Ok(())
}

/// Execute `config validate`.
#[allow(clippy::result_large_err)]
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    context::init_logging(&config);

    let warnings = warnings(&config);

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "warnings": warnings,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");

    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in &warnings {
            output::warning(warning);
        }
    }

    output::field("Next", format!("gpuarb config show -c {}", path.display()));

    Ok(())
}

/// Settings that are valid but probably not what the user meant.
fn warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.detector.min_percentage_savings.is_zero() {
        warnings.push("min_percentage_savings is 0: every price gap is reported".to_string());
    }
    if config.classifier.weights.density == 0.0 {
        warnings.push(
            "density weight is 0: provider count does not affect confidence".to_string(),
        );
    }
    let builtin = ReliabilityPriors::builtin();
    for provider in config.classifier.reliability.keys() {
        if builtin.is_known(&ProviderId::new(provider.as_str())) {
            warnings.push(format!(
                "reliability prior for '{provider}' replaces a built-in value"
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    #[test]
    fn test_config_template_is_valid_config() {
        let config = Config::parse_toml(CONFIG_TEMPLATE);
        assert!(config.is_ok(), "CONFIG_TEMPLATE is not a valid configuration");
    }

    #[test]
    fn test_config_template_documents_every_section() {
        for section in [
            "[logging]",
            "[detector]",
            "[classifier]",
            "[usage]",
            "[ranking]",
            "[aliases]",
        ] {
            assert!(CONFIG_TEMPLATE.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_execute_init_creates_file() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");

        execute_init(&config_path, false).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_init_creates_parent_directories() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("nested").join("dir").join("config.toml");

        execute_init(&config_path, false).unwrap();
        assert!(config_path.exists());
    }

    #[test]
    fn test_execute_init_fails_if_file_exists_without_force() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "existing content").unwrap();

        let error = execute_init(&config_path, false).unwrap_err();
        assert!(error.to_string().contains("--force"));

        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "existing content");
    }

    #[test]
    fn test_execute_init_overwrites_with_force() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "existing content").unwrap();

        execute_init(&config_path, true).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_validate_rejects_invalid_file() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[detector]\nmin_providers = 1\n").unwrap();

        assert!(execute_validate(&config_path).is_err());
    }

    #[test]
    fn test_execute_validate_missing_file() {
        let temp_dir = create_temp_dir();
        assert!(execute_validate(&temp_dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_warnings_for_suspicious_settings() {
        let config = Config::parse_toml(
            "[detector]\nmin_percentage_savings = 0\n\n[classifier.reliability]\naws = 0.9\nacme = 0.7\n",
        )
        .unwrap();

        let warnings = warnings(&config);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("min_percentage_savings"));
        assert!(warnings[1].contains("'aws'"));
    }

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(warnings(&Config::default()).is_empty());
    }
}
