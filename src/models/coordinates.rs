use crate::constants::{EARTH_RADIUS_KM, KM_PER_DEGREE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Project `distance_km` along `bearing_deg` (clockwise from north) using a
    /// flat-Earth approximation: 111 km per degree of latitude, scaled by
    /// cos(latitude) for longitude. Accurate to well under 1% at city scale.
    pub fn offset_by_bearing(&self, bearing_deg: f64, distance_km: f64) -> Coordinates {
        let lat_delta = distance_km / KM_PER_DEGREE;
        let lng_delta = distance_km / (KM_PER_DEGREE * self.lat.to_radians().cos());
        let bearing_rad = bearing_deg.to_radians();

        Coordinates {
            lat: self.lat + lat_delta * bearing_rad.cos(),
            lng: self.lng + lng_delta * bearing_rad.sin(),
        }
    }

    /// Shift by whole degree offsets, used for grid sampling around a point
    pub fn offset_degrees(&self, d_lat: f64, d_lng: f64) -> Coordinates {
        Coordinates {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }

    /// Round coordinates to specified decimal places for caching
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }
}
