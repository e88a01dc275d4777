//! Shared, lock-protected client state map

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::snapshot::{ClientStats, DropSnapshot};
use super::tracker::{ClientTracker, SequenceUpdate};
use crate::types::{ClientId, SequenceNumber};

/// Thread-safe owner of every client's continuity state
///
/// All mutation goes through [`update`](Self::update) and every read
/// through [`snapshot`](Self::snapshot); no caller ever touches the map
/// directly. One mutex covers the whole map rather than per-client locks
/// so that the read-modify-write of an update and the whole-map copy of a
/// snapshot are each a single critical section, which is what makes the
/// reporter's view consistent and makes concurrent updates to the same
/// client id (a client observed on two ports) serialize instead of losing
/// counts.
///
/// `Clone` is cheap and shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    clients: Arc<Mutex<HashMap<ClientId, ClientTracker>>>,
}

impl Aggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ClientId, ClientTracker>> {
        // A poisoned lock only means another worker panicked mid-update;
        // tracker state is two plain integers and stays usable.
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one parsed notification and return the continuity verdict
    ///
    /// First packet for an unknown client seeds its state; subsequent
    /// packets run the gap computation in [`ClientTracker::observe`]. The
    /// whole read-modify-write executes under the map lock.
    pub fn update(&self, client_id: ClientId, sequence: SequenceNumber) -> SequenceUpdate {
        let mut clients = self.lock();
        match clients.entry(client_id) {
            Entry::Occupied(mut entry) => entry.get_mut().observe(sequence),
            Entry::Vacant(entry) => {
                entry.insert(ClientTracker::new(sequence));
                SequenceUpdate::first()
            }
        }
    }

    /// Copy out every client's state in one atomic read
    #[must_use]
    pub fn snapshot(&self) -> DropSnapshot {
        let clients = self.lock();
        DropSnapshot::new(
            clients
                .iter()
                .map(|(id, tracker)| {
                    (
                        *id,
                        ClientStats {
                            last_sequence: tracker.last_sequence(),
                            dropped_total: tracker.dropped_total(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Number of clients seen since startup
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.lock().len()
    }
}
