//! Per-port monitor workers
//!
//! One blocking worker per serial port: read a line (bounded by the source's
//! own timeout), parse it under the active grammar, feed the aggregator,
//! emit exactly one diagnostic per line. Within a port, lines are processed
//! strictly in arrival order; across ports the aggregator's lock is the
//! only synchronization. A `watch` shutdown channel is checked at every
//! poll boundary, so shutdown latency is bounded by the read timeout plus
//! the idle sleep.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::device::{self, ProvisionPlan};
use crate::monitor_error::MonitorError;
use crate::protocol::{LineGrammar, ParseOutcome, RejectReason};
use crate::serial::SerialLineSource;
use crate::stats::Aggregator;
use crate::types::PortLabel;

/// One read attempt against a line source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A complete, already-trimmed, non-empty line
    Line(String),
    /// The source produced nothing (empty read)
    Empty,
    /// The read timed out; a polling point, not a failure
    TimedOut,
}

/// A monitored stream of text lines
///
/// Implementations own their transport exclusively and deliver decoded,
/// trimmed text. [`SerialLineSource`] is the production implementation;
/// tests script their own.
pub trait LineSource {
    /// Label identifying this source in diagnostics
    fn label(&self) -> &PortLabel;

    /// Blocking read of the next line, bounded by the source's timeout
    fn read_line(&mut self) -> Result<LineRead, MonitorError>;
}

/// Everything a port worker needs besides its port name
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub grammar: LineGrammar,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    /// Sleep between polls after an empty or timed-out read
    pub idle_poll: Duration,
    /// BLE provisioning to run before monitoring, if any
    pub provision: Option<ProvisionPlan>,
}

/// Parse one line and apply it to the aggregator, emitting the single
/// diagnostic the line earns
pub fn process_line(line: &str, label: &PortLabel, grammar: LineGrammar, aggregator: &Aggregator) {
    match grammar.parse(line) {
        ParseOutcome::Notification(record) => {
            let update = aggregator.update(record.client_id, record.sequence_number);
            if update.is_first {
                info!(
                    port = %label,
                    "Client {}: first packet with sequence {}",
                    record.client_id, record.sequence_number
                );
            } else if update.is_gap() {
                let previous = update.previous_sequence.unwrap_or(record.sequence_number);
                warn!(
                    port = %label,
                    "Client {}: detected {} dropped packets (last: {}, current: {})",
                    record.client_id, update.dropped_delta, previous, record.sequence_number
                );
            } else {
                info!(
                    port = %label,
                    "Client {}: packet received with sequence {}",
                    record.client_id, record.sequence_number
                );
            }
        }
        // Unrecognized lines are the firmware talking; pass them through
        ParseOutcome::Rejected(RejectReason::FormatMismatch) => {
            info!(port = %label, "{}", line);
        }
        ParseOutcome::Rejected(reason) => {
            warn!(port = %label, "{}", reason);
        }
    }
}

/// Drive one source until shutdown or source failure
///
/// Parser-level problems are logged and skipped; only a [`MonitorError`]
/// from the source ends the loop with an error, and that error never
/// reaches any other worker.
pub fn run_monitor_loop<S: LineSource>(
    source: &mut S,
    grammar: LineGrammar,
    aggregator: &Aggregator,
    shutdown: &watch::Receiver<bool>,
    idle_poll: Duration,
) -> Result<(), MonitorError> {
    while !*shutdown.borrow() {
        match source.read_line()? {
            LineRead::Line(line) => process_line(&line, source.label(), grammar, aggregator),
            LineRead::Empty | LineRead::TimedOut => std::thread::sleep(idle_poll),
        }
    }
    Ok(())
}

/// Spawn the blocking worker for one serial port
///
/// Failure to open or provision the port is logged and ends only this
/// worker, mirroring how a later read failure behaves.
#[must_use]
pub fn spawn_port_worker(
    port: String,
    config: WorkerConfig,
    aggregator: Aggregator,
    shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut source =
            match SerialLineSource::open(&port, config.baud_rate, config.read_timeout) {
                Ok(source) => {
                    info!("Opened serial port: {}", port);
                    source
                }
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };

        if let Some(plan) = &config.provision {
            if let Err(e) = device::provision(&mut source, plan) {
                error!("{}", e);
                return;
            }
        }

        match run_monitor_loop(
            &mut source,
            config.grammar,
            &aggregator,
            &shutdown,
            config.idle_poll,
        ) {
            Ok(()) => info!(port = %port, "monitor loop stopped"),
            Err(e) => error!("{}", e),
        }
    })
}
