//! Periodic drop-count summaries
//!
//! An interval task reading consistent snapshots from the aggregator and
//! logging one summary line per client, until shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::stats::Aggregator;

/// Log one summary line per client from a fresh snapshot
pub fn report_once(aggregator: &Aggregator) {
    let snapshot = aggregator.snapshot();
    if snapshot.is_empty() {
        debug!("Summary - no clients observed yet");
        return;
    }
    for (client_id, stats) in snapshot.iter() {
        info!(
            "Summary - Client {}: Dropped Packets: {} (last sequence {})",
            client_id, stats.dropped_total, stats.last_sequence
        );
    }
}

/// Spawn the summary task
///
/// Ticks at `interval` until the shutdown channel fires or its sender is
/// gone, then logs a final summary so the last counts are never lost.
#[must_use]
pub fn spawn_reporter(
    aggregator: Aggregator,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup chatter
        // is not interleaved with an empty summary.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => report_once(&aggregator),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        report_once(&aggregator);
    })
}
