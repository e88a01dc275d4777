//! Packet drop counter for BLE AT-firmware serial bridges
//!
//! BLE peripherals push sequence-numbered notifications through bridging
//! firmware that surfaces them as text lines on a serial port. This crate
//! monitors any number of such ports concurrently, parses each line under
//! one of two wire grammars, and tracks per-client sequence continuity to
//! count dropped packets in real time.
//!
//! The pipeline per port: [`monitor::LineSource`] delivers trimmed lines,
//! [`protocol::LineGrammar::parse`] turns one into a
//! [`protocol::NotificationRecord`] or a classified rejection, and
//! [`stats::Aggregator::update`] applies it atomically to the shared
//! per-client state. A reporter task periodically reads a consistent
//! [`stats::DropSnapshot`] and logs one summary line per client.

pub mod args;
pub mod config;
pub mod device;
pub mod logging;
pub mod monitor;
pub mod monitor_error;
pub mod protocol;
pub mod reporter;
pub mod runtime;
pub mod serial;
pub mod stats;
pub mod types;

pub use monitor_error::MonitorError;
pub use protocol::{LineGrammar, NotificationRecord, ParseOutcome, RejectReason};
pub use stats::{Aggregator, ClientStats, ClientTracker, DropSnapshot, SequenceUpdate};
pub use types::{ClientId, PortLabel, SequenceNumber};
