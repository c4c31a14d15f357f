//! Prediction cache with TTL expiry
//!
//! Keys combine the model name with the canonical encoding of the feature
//! vector. Expiry is lazy: entries are checked on read and overwritten on
//! the next miss, never swept proactively. There is no size cap, so the map
//! grows with the number of distinct keys over the process lifetime; see
//! DESIGN.md for the documented trade-off.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::Result;
use crate::features::FeatureVector;
use crate::registry::ModelName;

/// Whether a lookup was served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Cache key: model identifier plus feature bit patterns in field order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    model: ModelName,
    features: [u64; 4],
}

impl CacheKey {
    fn new(model: ModelName, features: &FeatureVector) -> Self {
        Self {
            model,
            features: features.key_bits(),
        }
    }
}

/// A cached prediction with its creation time
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    created_at: Instant,
    value: i64,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
}

/// TTL-bounded prediction cache
#[derive(Debug)]
pub struct PredictionCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PredictionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a prediction, computing and storing it on a miss.
    ///
    /// The compute step runs outside the lock, so two racing requests for
    /// the same key may both compute; the store is last-write-wins, which is
    /// harmless because predictions are pure functions of the key. A failing
    /// compute leaves the cache untouched.
    pub fn get_or_compute<F>(
        &self,
        model: ModelName,
        features: &FeatureVector,
        compute: F,
    ) -> Result<(i64, CacheStatus)>
    where
        F: FnOnce() -> Result<i64>,
    {
        let key = CacheKey::new(model, features);

        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(&key) {
                if !entry.is_expired(self.ttl) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok((entry.value, CacheStatus::Hit));
                }
            }
        }

        let value = compute()?;
        self.misses.fetch_add(1, Ordering::Relaxed);

        self.entries.write().insert(
            key,
            CacheEntry {
                created_at: Instant::now(),
                value,
            },
        );

        Ok((value, CacheStatus::Miss))
    }

    /// Number of entries physically present, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and keep the counters
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}
