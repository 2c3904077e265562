use crate::cache::CacheStats;
use crate::models::AreaBaseline;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// In-memory baseline cache backed by moka with TTL and bounded capacity.
/// All methods are `&self`, so one instance is shared across requests.
pub struct MemoryBaselineCache {
    baselines: Cache<String, AreaBaseline>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryBaselineCache {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let baselines = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        MemoryBaselineCache {
            baselines,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &str) -> Option<AreaBaseline> {
        match self.baselines.get(key).await {
            Some(baseline) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Baseline cache hit: {}", key);
                Some(baseline)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Baseline cache miss: {}", key);
                None
            }
        }
    }

    pub async fn insert(&self, key: &str, baseline: AreaBaseline) {
        self.baselines.insert(key.to_string(), baseline).await;
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.baselines.entry_count(),
        }
    }
}
