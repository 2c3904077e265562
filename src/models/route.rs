use crate::constants::MAX_TARGET_DISTANCE_KM;
use crate::models::{CompassDirection, Coordinates, SafetyAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A projected endpoint awaiting classification and verification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEndpoint {
    pub coordinates: Coordinates,
    pub direction: CompassDirection,
    pub planned_one_way_km: f64,
    /// Haversine distance from the start; diagnostics only, the routing
    /// service distance is authoritative
    pub straight_line_km: f64,
}

/// Result of an endpoint validity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointClassification {
    pub valid: bool,
    pub label: String,
}

/// Walking route returned by the distance provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkingRoute {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub encoded_polyline: String,
}

/// A candidate confirmed by the routing service, with its accuracy against the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedRoute {
    pub direction: CompassDirection,
    pub multiplier: f64,
    pub one_way_planned_km: f64,
    pub one_way_actual_km: f64,
    pub total_distance_km: f64,
    pub target_distance_km: f64,
    /// 100 * (1 - |total - target| / target); unclamped, may be negative
    pub accuracy: f64,
    pub duration_minutes: f64,
    pub endpoint: Coordinates,
    pub encoded_polyline: String,
    pub phase: u8,
}

impl VerifiedRoute {
    /// Build from a provider response. Returns `None` when the target is not
    /// positive, since accuracy is undefined there.
    pub fn from_walk(
        candidate: &CandidateEndpoint,
        walk: WalkingRoute,
        target_distance_km: f64,
        multiplier: f64,
        phase: u8,
    ) -> Option<Self> {
        let accuracy = route_accuracy(walk.distance_km * 2.0, target_distance_km)?;

        Some(VerifiedRoute {
            direction: candidate.direction,
            multiplier,
            one_way_planned_km: candidate.planned_one_way_km,
            one_way_actual_km: walk.distance_km,
            total_distance_km: walk.distance_km * 2.0,
            target_distance_km,
            accuracy,
            duration_minutes: walk.duration_minutes,
            endpoint: candidate.coordinates,
            encoded_polyline: walk.encoded_polyline,
            phase,
        })
    }
}

/// Percentage closeness of an out-and-back distance to the target.
pub fn route_accuracy(total_distance_km: f64, target_distance_km: f64) -> Option<f64> {
    if target_distance_km <= 0.0 {
        return None;
    }
    let difference = (total_distance_km - target_distance_km).abs();
    Some(100.0 * (1.0 - difference / target_distance_km))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDistance {
    pub target_distance: f64,
    pub total_distance: f64,
    pub one_way_planned: f64,
    pub one_way_actual: f64,
}

/// Final output record: verified route, its safety analysis and the blended score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRoute {
    pub direction: CompassDirection,
    pub accuracy: f64,
    /// `None` when the safety analysis was unavailable
    pub combined_score: Option<f64>,
    pub phase: u8,
    pub multiplier: f64,
    pub duration_minutes: f64,
    pub distance: RouteDistance,
    pub endpoint: Coordinates,
    pub polyline: String,
    pub safety_analysis: SafetyAnalysis,
}

impl RankedRoute {
    pub fn new(route: VerifiedRoute, safety: SafetyAnalysis, combined_score: Option<f64>) -> Self {
        RankedRoute {
            direction: route.direction,
            accuracy: route.accuracy,
            combined_score,
            phase: route.phase,
            multiplier: route.multiplier,
            duration_minutes: route.duration_minutes,
            distance: RouteDistance {
                target_distance: route.target_distance_km,
                total_distance: route.total_distance_km,
                one_way_planned: route.one_way_planned_km,
                one_way_actual: route.one_way_actual_km,
            },
            endpoint: route.endpoint,
            polyline: route.encoded_polyline,
            safety_analysis: safety,
        }
    }
}

/// Which rule ended the candidate search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTermination {
    /// Enough excellent routes in Phase 1
    ExcellentPhase1,
    /// Enough good routes in Phase 1
    GoodPhase1,
    /// Phase 2 ran; pooled routes above the fallback floor
    Fallback,
}

impl fmt::Display for SearchTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTermination::ExcellentPhase1 => write!(f, "excellent_phase1"),
            SearchTermination::GoodPhase1 => write!(f, "good_phase1"),
            SearchTermination::Fallback => write!(f, "fallback"),
        }
    }
}

/// External-call bookkeeping for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub candidates_generated: usize,
    pub candidates_filtered: usize,
    pub verification_calls: usize,
    pub verification_failures: usize,
    pub routes_verified: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub termination: SearchTermination,
    #[serde(flatten)]
    pub stats: SearchStats,
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct LoopRouteRequest {
    pub start_point: Coordinates,
    pub distance_km: f64,
}

impl LoopRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        Coordinates::new(self.start_point.lat, self.start_point.lng)?;
        if !self.distance_km.is_finite()
            || self.distance_km <= 0.0
            || self.distance_km > MAX_TARGET_DISTANCE_KM
        {
            return Err(format!(
                "distance_km must be greater than 0 and at most {}",
                MAX_TARGET_DISTANCE_KM
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub routes: Vec<RankedRoute>,
    pub search: SearchSummary,
}
