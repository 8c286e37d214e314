mod support;

use rust_decimal_macros::dec;

use gpuarb::application::SortMode;
use gpuarb::domain::Precision;
use gpuarb::error::{ConfigError, Error};
use gpuarb::infrastructure::config::settings::Config;

use support::fixtures::{market, write_temp};

#[test]
fn load_from_file() {
    let file = write_temp(
        "gpuarb.toml",
        r#"
[detector]
min_percentage_savings = 25
min_providers = 3

[usage]
unit_count = 8
duration_days = 7
hours_per_day = 12

[ranking]
precision = "tensor"
sort = "confidence"
top = 5
"#,
    );

    let config = Config::load(&file.path).unwrap();
    assert_eq!(config.detector.min_percentage_savings, dec!(25));
    assert_eq!(config.detector.min_providers, 3);
    assert_eq!(config.ranking.precision, Precision::Tensor);
    assert_eq!(config.ranking.sort, SortMode::Confidence);
    assert_eq!(config.ranking.top, Some(5));

    let scenario = config.usage_scenario().unwrap();
    assert_eq!(scenario.total_hours(), dec!(672));
}

#[test]
fn missing_file_is_read_error() {
    let result = Config::load("/nonexistent/gpuarb.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn empty_file_means_defaults() {
    let file = write_temp("empty.toml", "");
    let config = Config::load(&file.path).unwrap();
    assert_eq!(config.detector.min_percentage_savings, dec!(10));
    assert_eq!(config.usage_scenario().unwrap().total_hours(), dec!(720));
}

#[test]
fn rejects_savings_threshold_of_one_hundred() {
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
fn rejects_weights_not_summing_to_one() {
    let result = Config::parse_toml(
        "[classifier.weights]\navailability = 0.5\nreliability = 0.5\ndensity = 0.5\n",
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "classifier_weights",
            ..
        }))
    ));
}

#[test]
fn rejects_zero_units() {
    let result = Config::parse_toml("[usage]\nunit_count = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "unit_count",
            ..
        }))
    ));
}

#[test]
fn rejects_alias_to_unknown_model() {
    let result = Config::parse_toml("[aliases]\n\"Mystery\" = \"B9000\"\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "aliases",
            ..
        }))
    ));
}

#[test]
fn malformed_toml_is_parse_error() {
    let result = Config::parse_toml("[detector\nmin_providers = ");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn custom_spec_makes_unknown_model_comparable() {
    let config = Config::parse_toml(
        r#"
[[gpu_specs]]
model = "B9000"
fp32 = 90.0
memory_gb = 192
architecture = "Blackwell"
"#,
    )
    .unwrap();

    let mut records = market();
    records.push(support::fixtures::record("Lambda", "B9000", dec!(4.00), 0.8));
    let analysis = config.engine().unwrap().analyze(&records);

    assert_eq!(analysis.report.unknown_models(), 0);
    let b9000 = analysis
        .opportunities()
        .find(|o| o.gpu_model().as_str() == "B9000")
        .unwrap();
    assert_eq!(b9000.cheapest().provider().as_str(), "Lambda");
}

#[test]
fn configured_priors_change_risk() {
    let config = Config::parse_toml("[classifier.reliability]\nLambdaLabs = 0.99\n").unwrap();
    let engine = config.engine().unwrap();
    let analysis = engine.analyze(&support::fixtures::a100_pair());

    // availability 0.55 still keeps it out of the low tier
    let tier = analysis.recommendations[0].assessment().risk_tier();
    assert_ne!(tier, gpuarb::domain::RiskTier::Low);
}

#[test]
fn example_template_is_valid() {
    let template = include_str!("../config.toml.example");
    let config = Config::parse_toml(template).unwrap();
    assert_eq!(config.detector.min_providers, 2);
    assert_eq!(config.ranking.sort, SortMode::Savings);
}
