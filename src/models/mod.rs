pub mod coordinates;
pub mod direction;
pub mod geo;
pub mod route;
pub mod safety;

pub use coordinates::Coordinates;
pub use direction::CompassDirection;
pub use route::{
    CandidateEndpoint, EndpointClassification, RankedRoute, SearchStats, SearchSummary,
    SearchTermination, VerifiedRoute, WalkingRoute,
};
pub use safety::{
    AreaBaseline, IncidentAttribute, IncidentRatios, IncidentSummary, PathPoint,
    RouteSafetySummary, SafetyAnalysis, SafetyLevel, SegmentSafety,
};
