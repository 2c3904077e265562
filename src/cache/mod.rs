mod memory;

pub use memory::MemoryBaselineCache;

use crate::constants::BASELINE_CELL_DECIMALS;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Cache key for an area baseline.
/// Coordinates are rounded to the baseline cell (~100m), so sampled points in
/// the same block share one 25-query baseline estimate.
pub fn baseline_cache_key(center: &Coordinates, radius_km: f64, days_back: u32) -> String {
    let rounded = center.round(BASELINE_CELL_DECIMALS);
    let radius_m = (radius_km * 1000.0).round() as i64;
    format!(
        "baseline:{:.3}:{:.3}:{}:{}",
        rounded.lat, rounded.lng, radius_m, days_back
    )
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_key_consistency() {
        let coord = Coordinates::new(40.7296, -73.9834).unwrap();
        assert_eq!(
            baseline_cache_key(&coord, 0.5, 60),
            baseline_cache_key(&coord, 0.5, 60)
        );
    }

    #[test]
    fn test_baseline_key_coordinate_precision() {
        // Both inside the 40.730 / -73.983 cell
        let a = Coordinates::new(40.7301, -73.9832).unwrap();
        let b = Coordinates::new(40.7303, -73.9834).unwrap();
        assert_eq!(baseline_cache_key(&a, 0.5, 60), baseline_cache_key(&b, 0.5, 60));
        assert_eq!(baseline_cache_key(&a, 0.5, 60), "baseline:40.730:-73.983:500:60");

        // ~1km apart: different key
        let c = Coordinates::new(40.7391, -73.9832).unwrap();
        assert_ne!(baseline_cache_key(&a, 0.5, 60), baseline_cache_key(&c, 0.5, 60));
    }

    #[test]
    fn test_baseline_key_splits_at_cell_boundary() {
        // ~22m apart but on either side of 40.7305
        let below = Coordinates::new(40.7304, -73.9832).unwrap();
        let above = Coordinates::new(40.7306, -73.9832).unwrap();
        assert_eq!(baseline_cache_key(&below, 0.5, 60), "baseline:40.730:-73.983:500:60");
        assert_eq!(baseline_cache_key(&above, 0.5, 60), "baseline:40.731:-73.983:500:60");
    }

    #[test]
    fn test_baseline_key_includes_window() {
        let coord = Coordinates::new(40.7296, -73.9834).unwrap();
        assert_ne!(
            baseline_cache_key(&coord, 0.5, 60),
            baseline_cache_key(&coord, 0.5, 30)
        );
        assert_ne!(
            baseline_cache_key(&coord, 0.5, 60),
            baseline_cache_key(&coord, 1.0, 60)
        );
    }
}
