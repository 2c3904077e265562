use crate::constants::*;
use crate::models::{AreaBaseline, IncidentRatios, IncidentSummary};

/// Normalize raw counts by the local baseline. A zero baseline leaves the
/// raw count as the ratio.
pub fn incident_ratios(raw: &IncidentSummary, baseline: &AreaBaseline) -> IncidentRatios {
    IncidentRatios {
        crash: ratio(raw.crash_count, baseline.crash),
        injury: ratio(raw.injury_count, baseline.injury),
        fatality: ratio(raw.fatality_count, baseline.fatality),
    }
}

fn ratio(raw: u32, baseline: f64) -> f64 {
    if baseline > 0.0 {
        raw as f64 / baseline
    } else {
        raw as f64
    }
}

/// Logarithmic penalty: at or below baseline costs nothing, above it grows
/// with ln(ratio) up to `max`.
fn log_penalty(ratio: f64, coefficient: f64, max: f64) -> f64 {
    (coefficient * ratio.max(RATIO_LOG_FLOOR).ln()).clamp(0.0, max)
}

/// Score a sampled point from its baseline-normalized ratios (0-100).
pub fn safety_score(ratios: &IncidentRatios) -> f64 {
    let crash_penalty = log_penalty(
        ratios.crash,
        CRASH_PENALTY_COEFFICIENT,
        CRASH_PENALTY_MAX,
    );
    let injury_penalty = log_penalty(
        ratios.injury,
        INJURY_PENALTY_COEFFICIENT,
        INJURY_PENALTY_MAX,
    );
    let fatality_penalty = if ratios.fatality == 0.0 {
        0.0
    } else {
        log_penalty(
            ratios.fatality,
            FATALITY_PENALTY_COEFFICIENT,
            FATALITY_PENALTY_MAX,
        )
    };

    (100.0 - crash_penalty - injury_penalty - fatality_penalty).clamp(0.0, 100.0)
}
