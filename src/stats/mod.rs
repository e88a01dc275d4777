//! Sequence-gap accounting: per-client trackers behind a shared aggregator
//!
//! [`ClientTracker`] holds the only stateful invariants in the system
//! (forward-moving `last_sequence`, monotone `dropped_total`);
//! [`Aggregator`] owns the ClientId -> tracker map under a single mutex and
//! is the one synchronization point between port workers and the reporter.

mod aggregator;
mod snapshot;
mod tracker;

pub use aggregator::Aggregator;
pub use snapshot::{ClientStats, DropSnapshot};
pub use tracker::{ClientTracker, SequenceUpdate};
