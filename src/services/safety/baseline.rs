use crate::cache::{baseline_cache_key, MemoryBaselineCache};
use crate::constants::{BASELINE_CELL_DECIMALS, BASELINE_GRID_HALF_WIDTH};
use crate::db::IncidentStore;
use crate::models::{AreaBaseline, Coordinates, IncidentAttribute, IncidentSummary};
use futures::future::join_all;
use std::sync::Arc;

/// Estimates what "normal" incident levels look like around a point by
/// taking the median over a 5x5 grid of neighbouring windows.
pub struct BaselineEstimator {
    store: Arc<dyn IncidentStore>,
    radius_km: f64,
    days_back: u32,
    grid_step_deg: f64,
    cache: Option<Arc<MemoryBaselineCache>>,
}

impl BaselineEstimator {
    pub fn new(
        store: Arc<dyn IncidentStore>,
        radius_km: f64,
        days_back: u32,
        grid_step_deg: f64,
    ) -> Self {
        BaselineEstimator {
            store,
            radius_km,
            days_back,
            grid_step_deg,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<MemoryBaselineCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Grid centers, row-major from the south-west corner.
    pub fn grid_points(&self, center: &Coordinates) -> Vec<Coordinates> {
        let half = BASELINE_GRID_HALF_WIDTH;
        let mut points = Vec::with_capacity(((2 * half + 1) * (2 * half + 1)) as usize);
        for i in -half..=half {
            for j in -half..=half {
                points.push(center.offset_degrees(
                    i as f64 * self.grid_step_deg,
                    j as f64 * self.grid_step_deg,
                ));
            }
        }
        points
    }

    /// Center of the baseline cell containing `point`. Every point in a cell
    /// gets the same baseline, whether or not it was cached.
    pub fn cell_center(point: &Coordinates) -> Coordinates {
        point.round(BASELINE_CELL_DECIMALS)
    }

    /// Median crash, injury and fatality levels around the cell containing
    /// `point`. Windows whose lookup fails are left out; with no windows at
    /// all the baseline is zero, which makes the scorer fall back to raw counts.
    pub async fn estimate(&self, point: &Coordinates) -> AreaBaseline {
        let center = Self::cell_center(point);
        let key = baseline_cache_key(&center, self.radius_km, self.days_back);
        if let Some(cache) = &self.cache {
            if let Some(baseline) = cache.get(&key).await {
                return baseline;
            }
        }

        let samples = self.sample_grid(&center).await;
        if samples.is_empty() {
            tracing::warn!(
                lat = center.lat,
                lng = center.lng,
                "No baseline windows available around ({:.4}, {:.4})",
                center.lat, center.lng
            );
            return AreaBaseline::default();
        }

        let baseline = AreaBaseline {
            crash: median_of(&samples, IncidentAttribute::Crashes),
            injury: median_of(&samples, IncidentAttribute::Injuries),
            fatality: median_of(&samples, IncidentAttribute::Fatalities),
        };

        tracing::debug!(
            windows = samples.len(),
            crash = baseline.crash,
            injury = baseline.injury,
            fatality = baseline.fatality,
            "Baseline at ({:.4}, {:.4}) from {} windows",
            center.lat, center.lng, samples.len()
        );

        if let Some(cache) = &self.cache {
            cache.insert(&key, baseline).await;
        }
        baseline
    }

    /// Median of a single attribute around `point`.
    pub async fn estimate_attribute(
        &self,
        point: &Coordinates,
        attribute: IncidentAttribute,
    ) -> f64 {
        let baseline = self.estimate(point).await;
        match attribute {
            IncidentAttribute::Crashes => baseline.crash,
            IncidentAttribute::Injuries => baseline.injury,
            IncidentAttribute::Fatalities => baseline.fatality,
        }
    }

    async fn sample_grid(&self, center: &Coordinates) -> Vec<IncidentSummary> {
        let lookups = self.grid_points(center).into_iter().map(|point| async move {
            self.store
                .incident_summary(&point, self.radius_km, self.days_back)
                .await
                .map_err(|e| (point, e))
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(summary) => Some(summary),
                Err((point, e)) => {
                    tracing::warn!(
                        error = %e,
                        "Baseline window ({:.4}, {:.4}) skipped: {}",
                        point.lat, point.lng, e
                    );
                    None
                }
            })
            .collect()
    }
}

fn median_of(samples: &[IncidentSummary], attribute: IncidentAttribute) -> f64 {
    let mut values: Vec<f64> = samples.iter().map(|s| s.get(attribute) as f64).collect();
    median(&mut values)
}

/// 50th percentile; even-length inputs average the two middle values.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
