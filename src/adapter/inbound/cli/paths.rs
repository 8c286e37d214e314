//! Path utilities for gpuarb.
//!
//! User data lives under `~/.gpuarb/`:
//! - `~/.gpuarb/config.toml` - main configuration
//!
//! `GPUARB_CONFIG` (also read from `.env`) points at a different file.

use std::path::PathBuf;

/// Environment variable overriding the default config path.
pub const CONFIG_ENV: &str = "GPUARB_CONFIG";

/// Returns the gpuarb home directory (`~/.gpuarb/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gpuarb")
}

/// Returns the default config file path (`$GPUARB_CONFIG` or `~/.gpuarb/config.toml`).
pub fn default_config() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| home_dir().join("config.toml"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_is_under_gpuarb() {
        assert!(home_dir().to_string_lossy().contains(".gpuarb"));
    }

    #[test]
    fn default_config_is_toml() {
        if std::env::var_os(CONFIG_ENV).is_none() {
            assert!(default_config().ends_with(".gpuarb/config.toml"));
        }
    }
}
