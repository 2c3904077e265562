use crate::models::{RankedRoute, SafetyAnalysis, VerifiedRoute};
use std::cmp::Ordering;

/// Blend distance accuracy with mean path safety.
pub fn combined_score(accuracy: f64, safety: f64, accuracy_weight: f64, safety_weight: f64) -> f64 {
    accuracy_weight * accuracy + safety_weight * safety
}

/// Rank verified routes by combined score, highest first.
/// Routes without a safety score rank after every scored route and keep
/// their accuracy order among themselves.
pub fn rank_routes(
    analyzed: Vec<(VerifiedRoute, SafetyAnalysis)>,
    accuracy_weight: f64,
    safety_weight: f64,
) -> Vec<RankedRoute> {
    let mut ranked: Vec<RankedRoute> = analyzed
        .into_iter()
        .map(|(route, safety)| {
            let combined = safety
                .overall_score()
                .map(|s| combined_score(route.accuracy, s, accuracy_weight, safety_weight));
            RankedRoute::new(route, safety, combined)
        })
        .collect();

    ranked.sort_by(|a, b| match (a.combined_score, b.combined_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.accuracy.total_cmp(&a.accuracy),
    });

    ranked
}
