use super::endpoints::generate_endpoints;
use crate::config::PlannerConfig;
use crate::models::{
    CandidateEndpoint, Coordinates, SearchStats, SearchTermination, VerifiedRoute,
};
use crate::services::geocoding::EndpointClassifier;
use crate::services::google_routes::DistanceVerifier;
use futures::future::join_all;
use std::sync::Arc;

/// Routes chosen by the search, best accuracy first, with how the search ended.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub routes: Vec<VerifiedRoute>,
    pub termination: SearchTermination,
    pub stats: SearchStats,
}

enum CandidateOutcome {
    Filtered,
    VerificationFailed,
    Verified(VerifiedRoute),
}

/// Two-phase candidate search. Phase 1 tries the primary multiplier and stops
/// early when enough routes are accurate; Phase 2 sweeps the backup
/// multipliers and keeps everything above the fallback floor.
pub struct PhaseSearch {
    classifier: Arc<dyn EndpointClassifier>,
    verifier: Arc<dyn DistanceVerifier>,
    config: PlannerConfig,
}

impl PhaseSearch {
    pub fn new(
        classifier: Arc<dyn EndpointClassifier>,
        verifier: Arc<dyn DistanceVerifier>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            classifier,
            verifier,
            config,
        }
    }

    pub async fn search(&self, start: &Coordinates, target_distance_km: f64) -> SearchOutcome {
        let mut stats = SearchStats::default();

        let phase1 = self
            .run_phase(
                start,
                target_distance_km,
                self.config.primary_multiplier,
                1,
                &mut stats,
            )
            .await;

        let excellent = routes_at_least(&phase1, self.config.excellent_accuracy);
        if excellent.len() >= self.config.min_sufficient_routes {
            tracing::info!(
                excellent = excellent.len(),
                "Phase 1 sufficient: {} routes at >= {}% accuracy",
                excellent.len(), self.config.excellent_accuracy
            );
            return self.finish(excellent, SearchTermination::ExcellentPhase1, stats);
        }

        let good = routes_at_least(&phase1, self.config.good_accuracy);
        if good.len() >= self.config.min_sufficient_routes {
            tracing::info!(
                good = good.len(),
                "Phase 1 sufficient: {} routes at >= {}% accuracy",
                good.len(), self.config.good_accuracy
            );
            return self.finish(good, SearchTermination::GoodPhase1, stats);
        }

        tracing::info!(
            phase1_routes = phase1.len(),
            excellent = excellent.len(),
            good = good.len(),
            "Phase 1 insufficient ({} excellent, {} good), trying backup multipliers {:?}",
            excellent.len(), good.len(), self.config.backup_multipliers
        );

        let mut pooled = phase1;
        for &multiplier in &self.config.backup_multipliers {
            let routes = self
                .run_phase(start, target_distance_km, multiplier, 2, &mut stats)
                .await;
            pooled.extend(routes);
        }

        let fallback = routes_at_least(&pooled, self.config.fallback_accuracy);
        if fallback.len() < self.config.min_sufficient_routes {
            tracing::warn!(
                routes = fallback.len(),
                pooled = pooled.len(),
                "Only {} of {} pooled routes reach {}% accuracy",
                fallback.len(), pooled.len(), self.config.fallback_accuracy
            );
        }
        self.finish(fallback, SearchTermination::Fallback, stats)
    }

    /// Classify and verify every candidate at one multiplier. Results come
    /// back in bearing order.
    async fn run_phase(
        &self,
        start: &Coordinates,
        target_distance_km: f64,
        multiplier: f64,
        phase: u8,
        stats: &mut SearchStats,
    ) -> Vec<VerifiedRoute> {
        let one_way_km = target_distance_km * multiplier;
        let candidates = generate_endpoints(start, one_way_km);
        stats.candidates_generated += candidates.len();

        tracing::debug!(
            phase,
            multiplier,
            one_way_km = %format!("{:.2}", one_way_km),
            "Phase {}: {} candidates at {:.2}km one-way (x{})",
            phase, candidates.len(), one_way_km, multiplier
        );

        let outcomes = join_all(candidates.iter().map(|candidate| {
            self.evaluate_candidate(start, candidate, target_distance_km, multiplier, phase)
        }))
        .await;

        let mut routes = Vec::new();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Filtered => stats.candidates_filtered += 1,
                CandidateOutcome::VerificationFailed => {
                    stats.verification_calls += 1;
                    stats.verification_failures += 1;
                }
                CandidateOutcome::Verified(route) => {
                    stats.verification_calls += 1;
                    stats.routes_verified += 1;
                    routes.push(route);
                }
            }
        }
        routes
    }

    async fn evaluate_candidate(
        &self,
        start: &Coordinates,
        candidate: &CandidateEndpoint,
        target_distance_km: f64,
        multiplier: f64,
        phase: u8,
    ) -> CandidateOutcome {
        match self.classifier.classify(&candidate.coordinates).await {
            Ok(classification) if classification.valid => {}
            Ok(classification) => {
                tracing::debug!(
                    direction = %candidate.direction,
                    "{} endpoint rejected: {}",
                    candidate.direction, classification.label
                );
                return CandidateOutcome::Filtered;
            }
            Err(e) => {
                tracing::warn!(
                    direction = %candidate.direction,
                    error = %e,
                    "{} endpoint classification failed: {}",
                    candidate.direction, e
                );
                return CandidateOutcome::Filtered;
            }
        }

        let walk = match self.verifier.verify(start, &candidate.coordinates).await {
            Ok(walk) => walk,
            Err(e) => {
                tracing::warn!(
                    direction = %candidate.direction,
                    phase,
                    error = %e,
                    "{} route verification failed: {}",
                    candidate.direction, e
                );
                return CandidateOutcome::VerificationFailed;
            }
        };

        match VerifiedRoute::from_walk(candidate, walk, target_distance_km, multiplier, phase) {
            Some(route) => {
                tracing::debug!(
                    direction = %route.direction,
                    accuracy = %format!("{:.1}", route.accuracy),
                    "{}: {:.2}km round trip, {:.1}% accuracy",
                    route.direction, route.total_distance_km, route.accuracy
                );
                CandidateOutcome::Verified(route)
            }
            None => CandidateOutcome::VerificationFailed,
        }
    }

    fn finish(
        &self,
        mut routes: Vec<VerifiedRoute>,
        termination: SearchTermination,
        stats: SearchStats,
    ) -> SearchOutcome {
        // Stable: equal accuracies keep bearing order
        routes.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));

        tracing::info!(
            termination = %termination,
            routes = routes.len(),
            candidates = stats.candidates_generated,
            filtered = stats.candidates_filtered,
            verification_calls = stats.verification_calls,
            verification_failures = stats.verification_failures,
            "Search finished ({}): {} routes from {} candidates, {} routing calls",
            termination, routes.len(), stats.candidates_generated, stats.verification_calls
        );

        SearchOutcome {
            routes,
            termination,
            stats,
        }
    }
}

fn routes_at_least(routes: &[VerifiedRoute], min_accuracy: f64) -> Vec<VerifiedRoute> {
    routes
        .iter()
        .filter(|r| r.accuracy >= min_accuracy)
        .cloned()
        .collect()
}
