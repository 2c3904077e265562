use crate::constants::KM_PER_DEGREE;
use crate::models::Coordinates;

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Compute a bounding box around a center point with a radius in kilometers.
    /// Used as a cheap index-friendly prefilter before the exact distance check.
    pub fn from_center_radius(center: &Coordinates, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lng_delta = if center.lat.abs() > 85.0 {
            lat_delta
        } else {
            radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos())
        };

        BoundingBox {
            min_lat: center.lat - lat_delta,
            max_lat: center.lat + lat_delta,
            min_lng: center.lng - lng_delta,
            max_lng: center.lng + lng_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_encloses_radius() {
        let center = Coordinates::new(40.7296, -73.9834).unwrap();
        let bbox = BoundingBox::from_center_radius(&center, 0.5);

        let north = center.offset_by_bearing(0.0, 0.49);
        let east = center.offset_by_bearing(90.0, 0.49);
        let far = center.offset_by_bearing(45.0, 2.0);

        assert!(north.lat < bbox.max_lat);
        assert!(east.lng < bbox.max_lng);
        assert!((bbox.max_lat - center.lat - 0.5 / KM_PER_DEGREE).abs() < 1e-9);
        assert!((center.lat - bbox.min_lat - 0.5 / KM_PER_DEGREE).abs() < 1e-9);
        assert!(far.lat > bbox.max_lat && far.lng > bbox.max_lng);
    }
}
