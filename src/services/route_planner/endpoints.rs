use crate::models::{CandidateEndpoint, CompassDirection, Coordinates};

/// Project one candidate endpoint per compass direction, `one_way_km` from
/// `start`, in clockwise order from north.
pub fn generate_endpoints(start: &Coordinates, one_way_km: f64) -> Vec<CandidateEndpoint> {
    CompassDirection::ALL
        .iter()
        .map(|&direction| {
            let coordinates = start.offset_by_bearing(direction.bearing(), one_way_km);
            CandidateEndpoint {
                coordinates,
                direction,
                planned_one_way_km: one_way_km,
                straight_line_km: start.distance_to(&coordinates),
            }
        })
        .collect()
}
