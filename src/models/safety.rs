use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Incident totals near a point within a radius and lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub crash_count: u32,
    pub injury_count: u32,
    pub fatality_count: u32,
}

impl IncidentSummary {
    pub fn new(crash_count: u32, injury_count: u32, fatality_count: u32) -> Self {
        IncidentSummary {
            crash_count,
            injury_count,
            fatality_count,
        }
    }

    pub fn get(&self, attribute: IncidentAttribute) -> u32 {
        match attribute {
            IncidentAttribute::Crashes => self.crash_count,
            IncidentAttribute::Injuries => self.injury_count,
            IncidentAttribute::Fatalities => self.fatality_count,
        }
    }
}

impl AddAssign for IncidentSummary {
    fn add_assign(&mut self, other: Self) {
        self.crash_count += other.crash_count;
        self.injury_count += other.injury_count;
        self.fatality_count += other.fatality_count;
    }
}

/// Which incident total a baseline is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentAttribute {
    Crashes,
    Injuries,
    Fatalities,
}

/// Local median incident levels used to normalize raw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaBaseline {
    pub crash: f64,
    pub injury: f64,
    pub fatality: f64,
}

/// Raw counts divided by the local baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentRatios {
    pub crash: f64,
    pub injury: f64,
    pub fatality: f64,
}

/// A decoded path coordinate with its position along the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub coordinates: Coordinates,
    pub index: usize,
    /// Percentage along the path, 0.0 at the first point and 100.0 at the last
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLevel {
    #[serde(rename = "Very Safe")]
    VerySafe,
    Safe,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "Higher Risk")]
    HigherRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl SafetyLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            SafetyLevel::VerySafe
        } else if score >= 70.0 {
            SafetyLevel::Safe
        } else if score >= 55.0 {
            SafetyLevel::ModerateRisk
        } else if score >= 40.0 {
            SafetyLevel::HigherRisk
        } else {
            SafetyLevel::HighRisk
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SafetyLevel::VerySafe => "Very Safe",
            SafetyLevel::Safe => "Safe",
            SafetyLevel::ModerateRisk => "Moderate Risk",
            SafetyLevel::HigherRisk => "Higher Risk",
            SafetyLevel::HighRisk => "High Risk",
        };
        f.write_str(label)
    }
}

/// Safety evaluation of one sampled path point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSafety {
    pub point_index: usize,
    pub progress: f64,
    pub coordinates: Coordinates,
    pub incidents: IncidentSummary,
    pub ratios: IncidentRatios,
    pub safety_score: f64,
    pub safety_level: SafetyLevel,
}

/// Aggregate safety of a route, recomputed on every search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSafetySummary {
    /// Mean of the sampled scores, rounded to one decimal for display
    pub overall_safety_score: f64,
    /// Unrounded mean, used for ranking
    #[serde(skip)]
    pub mean_safety_score: f64,
    pub safety_level: SafetyLevel,
    pub segments_analyzed: usize,
    pub dangerous_segments: Vec<SegmentSafety>,
    pub incident_totals: IncidentSummary,
}

/// Outcome of analyzing a route's path. `Unavailable` is an explicit marker
/// so a missing analysis is never mistaken for a measured score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SafetyAnalysis {
    Scored(RouteSafetySummary),
    Unavailable { reason: String },
}

impl SafetyAnalysis {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SafetyAnalysis::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn overall_score(&self) -> Option<f64> {
        match self {
            SafetyAnalysis::Scored(summary) => Some(summary.mean_safety_score),
            SafetyAnalysis::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_level_bands() {
        assert_eq!(SafetyLevel::from_score(100.0), SafetyLevel::VerySafe);
        assert_eq!(SafetyLevel::from_score(85.0), SafetyLevel::VerySafe);
        assert_eq!(SafetyLevel::from_score(84.9), SafetyLevel::Safe);
        assert_eq!(SafetyLevel::from_score(55.0), SafetyLevel::ModerateRisk);
        assert_eq!(SafetyLevel::from_score(40.0), SafetyLevel::HigherRisk);
        assert_eq!(SafetyLevel::from_score(0.0), SafetyLevel::HighRisk);
    }

    #[test]
    fn test_incident_summary_accumulates() {
        let mut total = IncidentSummary::default();
        total += IncidentSummary::new(3, 1, 0);
        total += IncidentSummary::new(2, 2, 1);
        assert_eq!(total, IncidentSummary::new(5, 3, 1));
        assert_eq!(total.get(IncidentAttribute::Injuries), 3);
    }

    #[test]
    fn test_unavailable_analysis_serializes_with_status() {
        let analysis = SafetyAnalysis::unavailable("Could not decode route path");
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "Could not decode route path");
        assert!(json.get("overall_safety_score").is_none());
        assert!(analysis.overall_score().is_none());
    }
}
