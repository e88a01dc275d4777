//! Configuration loading from files and environment variables
//!
//! TOML file first, then environment overrides on top, so containerized
//! deployments can point at ports without editing the file.

use anyhow::{Context, Result};

use super::types::Config;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from a TOML file at this path
    File(String),
    /// Built from defaults (no file found)
    Defaults,
}

impl ConfigSource {
    /// Human-readable description for startup logging
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::File(path) => format!("config file '{}'", path),
            Self::Defaults => "built-in defaults".to_string(),
        }
    }
}

/// Load monitored ports from indexed environment variables
///
/// Reads `BLE_MONITOR_PORT_0`, `BLE_MONITOR_PORT_1`, and so on; the list
/// ends at the first missing index. Returns `None` when no indexed
/// variable is set.
fn load_ports_from_env() -> Option<Vec<String>> {
    let mut ports = Vec::new();
    let mut index = 0;

    while let Ok(port) = std::env::var(format!("BLE_MONITOR_PORT_{}", index)) {
        ports.push(port);
        index += 1;
    }

    if ports.is_empty() { None } else { Some(ports) }
}

/// Apply environment overrides on top of a loaded config
fn apply_env_overrides(config: &mut Config) {
    if let Some(ports) = load_ports_from_env() {
        tracing::info!("Using {} port(s) from environment variables", ports.len());
        config.ports = ports;
    }
    if let Some(baud) = std::env::var("BLE_MONITOR_BAUD_RATE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
    {
        config.serial.baud_rate = baud;
    }
}

/// Load configuration from a TOML file, with environment overrides
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse as the
/// expected TOML shape.
pub fn load_config(path: &str) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;
    let mut config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{}'", path))?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Load from a file when it exists, otherwise fall back to defaults
///
/// A present-but-broken file is still an error; only a missing file falls
/// back silently, matching how the monitor is usually run ad hoc with
/// everything on the command line.
pub fn load_config_with_fallback(path: &str) -> Result<(Config, ConfigSource)> {
    if std::path::Path::new(path).exists() {
        let config = load_config(path)?;
        Ok((config, ConfigSource::File(path.to_string())))
    } else {
        let mut config = Config::default();
        apply_env_overrides(&mut config);
        Ok((config, ConfigSource::Defaults))
    }
}
