//! Configuration validation run once at startup

use anyhow::{bail, Result};

use super::types::Config;

/// Reject configurations the monitor cannot run with
///
/// Ports may still be empty here; the CLI gets a chance to supply them, so
/// the final non-empty check happens at argument resolution.
pub fn validate(config: &Config) -> Result<()> {
    if config.serial.baud_rate == 0 {
        bail!("serial.baud_rate must be greater than zero");
    }
    if config.serial.read_timeout_ms == 0 {
        bail!("serial.read_timeout_ms must be greater than zero");
    }
    if config.monitor.report_interval_secs == 0 {
        bail!("monitor.report_interval_secs must be greater than zero");
    }
    if config.ble.provision && config.ble.peer_addresses.is_empty() && !config.ports.is_empty() {
        tracing::warn!(
            "provisioning is enabled but no peer addresses are configured; \
             ports will be monitored without BLE setup"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_baud_rate_rejected() {
        let mut config = Config::default();
        config.serial.baud_rate = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_read_timeout_rejected() {
        let mut config = Config::default();
        config.serial.read_timeout_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_report_interval_rejected() {
        let mut config = Config::default();
        config.monitor.report_interval_secs = 0;
        assert!(validate(&config).is_err());
    }
}
