//! Per-client sequence continuity tracking

use crate::types::SequenceNumber;

/// Outcome of observing one sequence number for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceUpdate {
    /// True if this was the first packet ever seen for the client
    pub is_first: bool,
    /// Number of sequence slots missing strictly between the previous and
    /// current packet; zero for continuations, duplicates and resets
    pub dropped_delta: u64,
    /// Sequence number the client was at before this observation
    pub previous_sequence: Option<SequenceNumber>,
}

impl SequenceUpdate {
    /// Update returned when a client is seen for the first time
    #[must_use]
    pub const fn first() -> Self {
        Self {
            is_first: true,
            dropped_delta: 0,
            previous_sequence: None,
        }
    }

    /// Whether this observation represents a gap in the stream
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        self.dropped_delta > 0
    }
}

/// Continuity state for a single client
///
/// Created on the first observed packet and never destroyed during a run.
/// `last_sequence` always tracks the most recently processed packet, even
/// when that packet opened a gap or jumped backwards; `dropped_total` only
/// ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTracker {
    last_sequence: SequenceNumber,
    dropped_total: u64,
}

impl ClientTracker {
    /// Seed state from the first observed packet
    #[must_use]
    pub const fn new(first_sequence: SequenceNumber) -> Self {
        Self {
            last_sequence: first_sequence,
            dropped_total: 0,
        }
    }

    /// Observe the next packet for this client
    ///
    /// A sequence ahead of `last_sequence + 1` counts the skipped slots as
    /// drops. A sequence at or behind the expected value counts zero drops
    /// and still resets `last_sequence` to the observed value. That reset
    /// policy is inherited from the device tooling and is a known
    /// limitation: a genuine counter wraparound (24-bit labeled, 32-bit
    /// raw) or a duplicate retransmission is indistinguishable from a
    /// reset and silently counts nothing.
    pub fn observe(&mut self, sequence: SequenceNumber) -> SequenceUpdate {
        let previous = self.last_sequence;
        let expected = previous.get().saturating_add(1);
        let dropped_delta = sequence.get().saturating_sub(expected);

        self.last_sequence = sequence;
        self.dropped_total = self.dropped_total.saturating_add(dropped_delta);

        SequenceUpdate {
            is_first: false,
            dropped_delta,
            previous_sequence: Some(previous),
        }
    }

    /// Most recently processed sequence number
    #[must_use]
    pub const fn last_sequence(&self) -> SequenceNumber {
        self.last_sequence
    }

    /// Total packets counted as dropped since the first observation
    #[must_use]
    pub const fn dropped_total(&self) -> u64 {
        self.dropped_total
    }
}
