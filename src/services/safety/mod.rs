mod baseline;
pub mod polyline;
pub mod scoring;

pub use baseline::{median, BaselineEstimator};
pub use polyline::{decode_path, decode_polyline, sample_path};
pub use scoring::{incident_ratios, safety_score};

use crate::cache::MemoryBaselineCache;
use crate::config::SafetyConfig;
use crate::db::IncidentStore;
use crate::models::{
    IncidentSummary, RouteSafetySummary, SafetyAnalysis, SafetyLevel, SegmentSafety,
    VerifiedRoute,
};
use std::sync::Arc;

/// Scores a route by sampling points along its walking path and comparing
/// local incident counts against the neighbourhood baseline.
pub struct SafetyAnalyzer {
    store: Arc<dyn IncidentStore>,
    baseline: BaselineEstimator,
    config: SafetyConfig,
}

impl SafetyAnalyzer {
    pub fn new(store: Arc<dyn IncidentStore>, config: SafetyConfig) -> Self {
        let baseline = BaselineEstimator::new(
            store.clone(),
            config.radius_km,
            config.days_back,
            config.baseline_grid_step_deg,
        );
        SafetyAnalyzer {
            store,
            baseline,
            config,
        }
    }

    pub fn with_baseline_cache(mut self, cache: Arc<MemoryBaselineCache>) -> Self {
        self.baseline = self.baseline.with_cache(cache);
        self
    }

    pub async fn analyze_route(&self, route: &VerifiedRoute) -> SafetyAnalysis {
        self.analyze_polyline(&route.encoded_polyline).await
    }

    /// Decode, sample and score a path. Samples whose incident lookup fails
    /// are dropped; a path with no scored samples is `Unavailable`.
    pub async fn analyze_polyline(&self, encoded_polyline: &str) -> SafetyAnalysis {
        let path = decode_path(encoded_polyline);
        if path.is_empty() {
            return SafetyAnalysis::unavailable("Could not decode route path");
        }

        let samples = sample_path(&path, self.config.sample_count);
        let mut segments = Vec::with_capacity(samples.len());

        for sample in &samples {
            let incidents = match self
                .store
                .incident_summary(
                    &sample.coordinates,
                    self.config.radius_km,
                    self.config.days_back,
                )
                .await
            {
                Ok(incidents) => incidents,
                Err(e) => {
                    tracing::warn!(
                        point_index = sample.index,
                        error = %e,
                        "Incident lookup failed at path point {}: {}",
                        sample.index, e
                    );
                    continue;
                }
            };

            let baseline = self.baseline.estimate(&sample.coordinates).await;
            let ratios = incident_ratios(&incidents, &baseline);
            let score = safety_score(&ratios);

            segments.push(SegmentSafety {
                point_index: sample.index,
                progress: sample.progress,
                coordinates: sample.coordinates,
                incidents,
                ratios,
                safety_score: score,
                safety_level: SafetyLevel::from_score(score),
            });
        }

        if segments.is_empty() {
            return SafetyAnalysis::unavailable("No incident data available along route");
        }

        let summary = self.summarize(segments);
        tracing::debug!(
            overall = summary.overall_safety_score,
            segments = summary.segments_analyzed,
            dangerous = summary.dangerous_segments.len(),
            "Route safety {:.1} ({}) over {} points",
            summary.overall_safety_score, summary.safety_level, summary.segments_analyzed
        );
        SafetyAnalysis::Scored(summary)
    }

    fn summarize(&self, segments: Vec<SegmentSafety>) -> RouteSafetySummary {
        let segments_analyzed = segments.len();
        let mean = segments.iter().map(|s| s.safety_score).sum::<f64>() / segments_analyzed as f64;
        let overall_safety_score = (mean * 10.0).round() / 10.0;

        let mut incident_totals = IncidentSummary::default();
        for segment in &segments {
            incident_totals += segment.incidents;
        }

        let dangerous_segments = segments
            .into_iter()
            .filter(|s| s.safety_score < self.config.dangerous_threshold)
            .collect();

        RouteSafetySummary {
            overall_safety_score,
            mean_safety_score: mean,
            safety_level: SafetyLevel::from_score(mean),
            segments_analyzed,
            dangerous_segments,
            incident_totals,
        }
    }
}
