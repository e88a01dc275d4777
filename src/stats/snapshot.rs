//! Point-in-time copies of aggregated drop statistics

use crate::types::{ClientId, SequenceNumber};

/// Per-client statistics as captured in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientStats {
    pub last_sequence: SequenceNumber,
    pub dropped_total: u64,
}

/// Consistent copy of every client's state, taken atomically under the
/// aggregator's lock and sorted by client id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropSnapshot {
    entries: Vec<(ClientId, ClientStats)>,
}

impl DropSnapshot {
    pub(super) fn new(mut entries: Vec<(ClientId, ClientStats)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);
        Self { entries }
    }

    /// Iterate clients in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (ClientId, &ClientStats)> {
        self.entries.iter().map(|(id, stats)| (*id, stats))
    }

    /// Number of clients observed so far
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.entries.len()
    }

    /// True while no client has sent a first packet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of dropped packets across all clients
    #[must_use]
    pub fn total_dropped(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, stats)| stats.dropped_total)
            .sum()
    }

    /// Look up one client's stats
    #[must_use]
    pub fn get(&self, client_id: ClientId) -> Option<&ClientStats> {
        self.entries
            .iter()
            .find(|(id, _)| *id == client_id)
            .map(|(_, stats)| stats)
    }
}
