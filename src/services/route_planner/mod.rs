mod endpoints;
mod phase_search;
mod ranking;

pub use endpoints::generate_endpoints;
pub use phase_search::{PhaseSearch, SearchOutcome};
pub use ranking::{combined_score, rank_routes};

use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::route::RouteResponse;
use crate::models::{Coordinates, SearchSummary};
use crate::services::geocoding::EndpointClassifier;
use crate::services::google_routes::DistanceVerifier;
use crate::services::safety::SafetyAnalyzer;
use std::sync::Arc;

/// Plans out-and-back running routes: searches for endpoints whose walking
/// distance matches the target, then ranks the results by safety.
pub struct RoutePlanner {
    search: PhaseSearch,
    safety: SafetyAnalyzer,
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(
        classifier: Arc<dyn EndpointClassifier>,
        verifier: Arc<dyn DistanceVerifier>,
        safety: SafetyAnalyzer,
        config: PlannerConfig,
    ) -> Self {
        let search = PhaseSearch::new(classifier, verifier, config.clone());
        RoutePlanner {
            search,
            safety,
            config,
        }
    }

    pub async fn plan_routes(
        &self,
        start: Coordinates,
        target_distance_km: f64,
    ) -> Result<RouteResponse> {
        if !target_distance_km.is_finite() || target_distance_km <= 0.0 {
            return Err(AppError::InvalidRequest(format!(
                "Target distance must be positive, got {}",
                target_distance_km
            )));
        }

        tracing::info!(
            lat = start.lat,
            lng = start.lng,
            target_km = target_distance_km,
            "Planning routes from ({:.4}, {:.4}), target {:.1}km",
            start.lat, start.lng, target_distance_km
        );

        let outcome = self.search.search(&start, target_distance_km).await;

        let mut analyzed = Vec::with_capacity(outcome.routes.len());
        for route in outcome.routes {
            let safety = self.safety.analyze_route(&route).await;
            analyzed.push((route, safety));
        }

        let routes = rank_routes(
            analyzed,
            self.config.accuracy_weight,
            self.config.safety_weight,
        );

        Ok(RouteResponse {
            routes,
            search: SearchSummary {
                termination: outcome.termination,
                stats: outcome.stats,
            },
        })
    }
}
