//! Command-line argument surface
//!
//! Every flag is an override on top of the config file; `effective_*`
//! helpers apply the CLI > env > file > default precedence.

use clap::Parser;

use crate::config::Config;
use crate::protocol::LineGrammar;

/// Monitor serial ports for BLE notification packet drops
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Serial ports to monitor, e.g. /dev/ttyUSB0 /dev/ttyUSB1
    #[arg(short, long, num_args = 1..)]
    pub ports: Vec<String>,

    /// Baud rate for serial communication (overrides config file)
    #[arg(short, long, env = "BLE_MONITOR_BAUD_RATE")]
    pub baudrate: Option<u32>,

    /// Notification line grammar the firmware emits
    #[arg(short, long, value_enum, env = "BLE_MONITOR_GRAMMAR")]
    pub grammar: Option<LineGrammar>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", env = "BLE_MONITOR_CONFIG")]
    pub config: String,

    /// Seconds between drop-count summaries (overrides config file)
    #[arg(long, env = "BLE_MONITOR_REPORT_INTERVAL")]
    pub report_interval: Option<u64>,

    /// BLE peer addresses, distributed over the ports in order
    #[arg(long = "peer")]
    pub peers: Vec<String>,

    /// Skip BLE provisioning (the bridge is already connected and notifying)
    #[arg(long)]
    pub no_provision: bool,

    /// Number of worker threads for the runtime (default: 1)
    #[arg(short, long, env = "BLE_MONITOR_THREADS")]
    pub threads: Option<usize>,
}

impl Args {
    /// Ports to monitor, CLI list winning over the config file
    #[must_use]
    pub fn effective_ports<'a>(&'a self, config: &'a Config) -> &'a [String] {
        if self.ports.is_empty() {
            &config.ports
        } else {
            &self.ports
        }
    }

    /// Baud rate with CLI override applied
    #[must_use]
    pub fn effective_baud_rate(&self, config: &Config) -> u32 {
        self.baudrate.unwrap_or(config.serial.baud_rate)
    }

    /// Active line grammar with CLI override applied
    #[must_use]
    pub fn effective_grammar(&self, config: &Config) -> LineGrammar {
        self.grammar.unwrap_or(config.monitor.grammar)
    }

    /// Summary interval with CLI override applied
    #[must_use]
    pub fn effective_report_interval(&self, config: &Config) -> std::time::Duration {
        self.report_interval
            .map_or_else(|| config.monitor.report_interval(), std::time::Duration::from_secs)
    }

    /// Peer addresses, CLI list winning over the config file
    #[must_use]
    pub fn effective_peers<'a>(&'a self, config: &'a Config) -> &'a [String] {
        if self.peers.is_empty() {
            &config.ble.peer_addresses
        } else {
            &self.peers
        }
    }

    /// Whether ports get the AT provisioning sequence before monitoring
    #[must_use]
    pub fn provisioning_enabled(&self, config: &Config) -> bool {
        !self.no_provision && config.ble.provision
    }

    /// Reject override values the config layer would refuse
    ///
    /// Config validation runs on the file's values before overrides, so
    /// the effective values need the same checks or a CLI/env flag can
    /// smuggle in a zero the monitor cannot run with.
    pub fn validate_overrides(&self, config: &Config) -> anyhow::Result<()> {
        if self.effective_baud_rate(config) == 0 {
            anyhow::bail!("baud rate must be greater than zero");
        }
        if self.effective_report_interval(config).is_zero() {
            anyhow::bail!("report interval must be greater than zero");
        }
        Ok(())
    }
}
