//! Sliding-window data log
//!
//! Append-only log of served predictions. The log itself is unbounded;
//! drift reporting only ever looks at the most recent `n` entries, so older
//! entries simply age out of the reporting sample without being evicted.

use parking_lot::RwLock;
use serde::Serialize;

use crate::features::FeatureVector;

/// One logged prediction event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowEntry {
    pub features: FeatureVector,
    pub prediction: i64,
}

/// Append-only prediction log
#[derive(Debug)]
pub struct WindowLog {
    entries: RwLock<Vec<WindowEntry>>,
}

impl WindowLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append an entry. Entries are ordered by append completion, not by
    /// original request arrival.
    pub fn append(&self, entry: WindowEntry) {
        self.entries.write().push(entry);
    }

    /// The `n` most recent entries in append order, or everything when the
    /// log holds fewer. Non-destructive.
    pub fn sample(&self, n: usize) -> Vec<WindowEntry> {
        let entries = self.entries.read();
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for WindowLog {
    fn default() -> Self {
        Self::new()
    }
}
