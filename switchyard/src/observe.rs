//! Opt-in observation of route consistency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::warn;

/// Records the first backend alias observed for each file identity and
/// warns when a later resolution of the same identity lands elsewhere.
///
/// Purely observational: recording never alters routing. A resolver that
/// violates the determinism contract otherwise shows up only as files
/// "missing" from whichever backend a read was routed to; this puts the
/// divergence in the logs instead.
#[derive(Debug, Default)]
pub struct RouteObserver {
    seen: Mutex<HashMap<String, String>>,
    divergences: AtomicU64,
}

impl RouteObserver {
    pub fn record(&self, file_identity: &str, alias: &str) {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        match seen.get(file_identity) {
            Some(first) if first != alias => {
                self.divergences.fetch_add(1, Ordering::Relaxed);
                warn!(
                    file = %file_identity,
                    first = %first,
                    now = %alias,
                    "Resolver routed the same file identity to a different backend"
                );
            }
            Some(_) => {}
            None => {
                seen.insert(file_identity.to_string(), alias.to_string());
            }
        }
    }

    /// The alias first observed for `file_identity`, if any.
    pub fn first_seen(&self, file_identity: &str) -> Option<String> {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(file_identity)
            .cloned()
    }

    /// How many divergent resolutions have been observed so far.
    pub fn divergence_count(&self) -> u64 {
        self.divergences.load(Ordering::Relaxed)
    }
}
