//! Caller-owned memoization of analytics results
//!
//! Results are keyed on a SHA-256 fingerprint of the serialized record
//! snapshot, so any edit to the collection produces a miss. The cache is
//! bounded and evicts the least recently used entry; it holds no global
//! state and is shared only by whoever owns it.

use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::analytics::CycleAnalyzer;
use crate::error::Result;
use crate::models::{AnalyticsResult, DailyRecord, PeriodRecord};

/// Default number of cached results
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Content fingerprint of a record snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotFingerprint(String);

impl SnapshotFingerprint {
    pub fn generate(records: &[PeriodRecord], daily_records: &[DailyRecord]) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(records)?);
        // separator keeps the two collections from aliasing
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(daily_records)?);
        Ok(SnapshotFingerprint(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded LRU cache of analytics results
#[derive(Debug)]
pub struct AnalyticsCache {
    capacity: usize,
    /// Most recently used at the back
    entries: VecDeque<(SnapshotFingerprint, AnalyticsResult)>,
    metrics: CacheMetrics,
}

impl AnalyticsCache {
    /// Create a cache holding at most `capacity` results (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        AnalyticsCache {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            metrics: CacheMetrics::default(),
        }
    }

    /// Cached result for the snapshot, computing and storing it on a miss
    pub fn get_or_compute(
        &mut self,
        analyzer: &CycleAnalyzer,
        records: &[PeriodRecord],
        daily_records: &[DailyRecord],
    ) -> Result<AnalyticsResult> {
        let fingerprint = SnapshotFingerprint::generate(records, daily_records)?;

        if let Some(pos) = self.entries.iter().position(|(key, _)| *key == fingerprint) {
            self.metrics.hits += 1;
            trace!(fingerprint = fingerprint.as_str(), "Analytics cache hit");
            if let Some(entry) = self.entries.remove(pos) {
                let result = entry.1.clone();
                self.entries.push_back(entry);
                return Ok(result);
            }
        }

        self.metrics.misses += 1;
        let result = analyzer.compute_analytics(records, daily_records);
        self.insert(fingerprint, result.clone());
        Ok(result)
    }

    fn insert(&mut self, fingerprint: SnapshotFingerprint, result: AnalyticsResult) {
        while self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.pop_front() {
                self.metrics.evictions += 1;
                debug!(fingerprint = evicted.as_str(), "Evicted analytics cache entry");
            }
        }
        self.entries.push_back((fingerprint, result));
    }

    /// Drop every cached result
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.metrics
    }
}

impl Default for AnalyticsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
