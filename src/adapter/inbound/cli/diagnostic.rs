//! Miette-based error diagnostics for CLI error presentation.
//!
//! Fatal errors are converted into one of these diagnostics so the terminal
//! shows an error code, the underlying cause and a suggestion.

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::error::{ConfigError as SettingsError, Error};

/// Configuration could not be read, parsed or validated.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(gpuarb::config))]
pub struct ConfigError {
    /// Human-readable error message.
    pub message: String,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    /// Add a help suggestion to the error.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// The price input could not be used at all.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(gpuarb::input))]
pub struct InputError {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

impl InputError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A usage scenario parameter is out of range.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(
    code(gpuarb::usage),
    help("units and days must be at least 1; hours per day must be within (0, 24]")
)]
pub struct UsageError {
    pub message: String,
}

/// Convert a crate error into a rendered diagnostic.
#[must_use]
pub fn report(error: Error) -> miette::Report {
    let message = error.to_string();
    match error {
        Error::Config(SettingsError::InvalidValue {
            field: "unit_count" | "duration_days" | "hours_per_day",
            ..
        }) => UsageError { message }.into(),
        Error::Config(SettingsError::ReadFile(_)) => ConfigError::new(message)
            .with_help("run `gpuarb config init` to create a configuration file")
            .into(),
        Error::Config(SettingsError::Parse(_)) => ConfigError::new(message)
            .with_help("check the TOML syntax and section names")
            .into(),
        Error::Config(_) => ConfigError::new(message)
            .with_help("run `gpuarb config validate` to check every setting")
            .into(),
        Error::Domain(DomainError::InvalidUsage { .. }) => UsageError { message }.into(),
        Error::Domain(_) => ConfigError::new(message)
            .with_help("check the [[gpu_specs]] and [aliases] sections")
            .into(),
        Error::Record(_) => InputError::new(message)
            .with_help("run `gpuarb models` to list known GPU models")
            .into(),
        Error::Input(_) | Error::Json(_) => InputError::new(message)
            .with_help("the price file must be a JSON array of price records")
            .into(),
        Error::Io(_) => InputError::new(message)
            .with_help("check that the file exists and is readable")
            .into(),
    }
}
