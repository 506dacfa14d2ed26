//! Per-user disambiguation state.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// How long a pending disambiguation survives before it is pruned.
pub const DEFAULT_SELECTION_TTL: Duration = Duration::from_secs(300);

/// Keyed store of pending disambiguation lists.
///
/// Injected into the resolver so the in-memory default can be swapped for a
/// persistent or distributed backing store without touching the state machine.
/// A user never has more than one pending selection: `set` replaces any
/// existing entry.
pub trait SelectionStore: Send + Sync {
    /// Record the candidate addresses awaiting a choice from `user_id`,
    /// replacing any previous entry.
    fn set(&self, user_id: &str, candidates: Vec<String>) -> impl Future<Output = ()> + Send;

    /// Current candidates for `user_id`, if a live entry exists.
    fn get(&self, user_id: &str) -> impl Future<Output = Option<Vec<String>>> + Send;

    /// Remove and return the live entry for `user_id` in one atomic step.
    ///
    /// Concurrent callers racing on the same user must not both receive the
    /// entry: exactly one take observes it, the rest see `None`.
    fn take(&self, user_id: &str) -> impl Future<Output = Option<Vec<String>>> + Send;

    /// Drop the entry for `user_id`, if any.
    fn delete(&self, user_id: &str) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone)]
struct PendingEntry {
    candidates: Vec<String>,
    created_at: Instant,
}

/// Process-memory selection store with TTL-based pruning.
///
/// All operations take one shared mutex, so individual get/set/delete calls
/// are serialized across users. Entries older than the TTL are treated as
/// absent and swept out on access; there is no background reaper.
#[derive(Debug, Clone)]
pub struct InMemorySelectionStore {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, PendingEntry>>>,
}

impl InMemorySelectionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn is_expired(&self, entry: &PendingEntry) -> bool {
        entry.created_at.elapsed() > self.ttl
    }
}

impl Default for InMemorySelectionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTION_TTL)
    }
}

impl SelectionStore for InMemorySelectionStore {
    async fn set(&self, user_id: &str, candidates: Vec<String>) {
        let mut entries = self.entries.lock().await;
        // Sweep expired entries while we hold the lock anyway, so abandoned
        // selections cannot accumulate in a long-running process.
        entries.retain(|_, entry| entry.created_at.elapsed() <= self.ttl);
        entries.insert(
            user_id.to_string(),
            PendingEntry {
                candidates,
                created_at: Instant::now(),
            },
        );
    }

    async fn get(&self, user_id: &str) -> Option<Vec<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(user_id) {
            Some(entry) if self.is_expired(entry) => {
                entries.remove(user_id);
                None
            }
            Some(entry) => Some(entry.candidates.clone()),
            None => None,
        }
    }

    async fn take(&self, user_id: &str) -> Option<Vec<String>> {
        let mut entries = self.entries.lock().await;
        // Remove first, under the one lock, so racing takers cannot both
        // observe the entry.
        match entries.remove(user_id) {
            Some(entry) if self.is_expired(&entry) => None,
            Some(entry) => Some(entry.candidates),
            None => None,
        }
    }

    async fn delete(&self, user_id: &str) {
        self.entries.lock().await.remove(user_id);
    }
}
