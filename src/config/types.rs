//! Configuration type definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::protocol::LineGrammar;

/// Top-level monitor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serial ports to monitor, one worker each
    #[serde(default)]
    pub ports: Vec<String>,
    /// Serial link settings
    #[serde(default)]
    pub serial: SerialConfig,
    /// Parsing and reporting settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// BLE provisioning settings
    #[serde(default)]
    pub ble: BleConfig,
}

/// Serial link settings shared by all ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    #[serde(default = "defaults::baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "defaults::read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "defaults::idle_poll_ms")]
    pub idle_poll_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: defaults::baud_rate(),
            read_timeout_ms: defaults::read_timeout_ms(),
            idle_poll_ms: defaults::idle_poll_ms(),
        }
    }
}

impl SerialConfig {
    /// Blocking-read timeout as a `Duration`
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Inter-poll idle sleep as a `Duration`
    #[must_use]
    pub const fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

/// Parsing and reporting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Which notification line grammar the firmware emits
    #[serde(default)]
    pub grammar: LineGrammar,
    #[serde(default = "defaults::report_interval_secs")]
    pub report_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            grammar: LineGrammar::default(),
            report_interval_secs: defaults::report_interval_secs(),
        }
    }
}

impl MonitorConfig {
    /// Summary cadence as a `Duration`
    #[must_use]
    pub const fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}

/// BLE provisioning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleConfig {
    /// Peer addresses, distributed over the monitored ports in order
    #[serde(default)]
    pub peer_addresses: Vec<String>,
    #[serde(default = "defaults::service_uuid")]
    pub service_uuid: String,
    #[serde(default = "defaults::characteristic_uuid")]
    pub characteristic_uuid: String,
    /// Set false when the bridge is already connected and notifying
    #[serde(default = "defaults::provision")]
    pub provision: bool,
    #[serde(default = "defaults::settle_ms")]
    pub settle_ms: u64,
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            peer_addresses: Vec::new(),
            service_uuid: defaults::service_uuid(),
            characteristic_uuid: defaults::characteristic_uuid(),
            provision: defaults::provision(),
            settle_ms: defaults::settle_ms(),
        }
    }
}

impl BleConfig {
    /// Post-command settle pause as a `Duration`
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
