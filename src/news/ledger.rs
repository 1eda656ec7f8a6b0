//! Dedup ledger: remembers which news URLs were already posted.

use std::collections::HashSet;
use std::sync::Mutex;

/// Record of news identifiers that have already been used.
///
/// The selector only talks to this trait, so the retention policy
/// (unbounded, LRU, persisted) can change without touching selection.
pub trait DedupLedger: Send + Sync {
    fn contains(&self, url: &str) -> bool;

    /// Record a URL. Returns `false` if it was already present.
    fn record(&self, url: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime ledger: append-only, no eviction.
///
/// Grows by one entry per posted article; news volume is low enough that
/// this stays small for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    seen: Mutex<HashSet<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn seen(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.seen.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DedupLedger for MemoryLedger {
    fn contains(&self, url: &str) -> bool {
        self.seen().contains(url)
    }

    fn record(&self, url: &str) -> bool {
        self.seen().insert(url.to_string())
    }

    fn len(&self) -> usize {
        self.seen().len()
    }
}
