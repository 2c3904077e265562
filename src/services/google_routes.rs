use crate::error::{AppError, Result};
use crate::models::{Coordinates, WalkingRoute};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GOOGLE_ROUTES_BASE_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
const ROUTES_FIELD_MASK: &str =
    "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline";

/// Resolves the actual walking distance between two points.
/// Any error means "this candidate produced no route"; callers do not retry.
#[async_trait]
pub trait DistanceVerifier: Send + Sync {
    async fn verify(&self, start: &Coordinates, end: &Coordinates) -> Result<WalkingRoute>;
}

#[derive(Clone)]
pub struct GoogleRoutesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleRoutesClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, GOOGLE_ROUTES_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GoogleRoutesClient {
            client,
            api_key,
            base_url,
        })
    }

    /// Request a walking route between two points.
    /// Returns the first route's distance, duration and encoded polyline.
    pub async fn get_walking_route(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<WalkingRoute> {
        let body = ComputeRoutesRequest {
            origin: Waypoint::from(start),
            destination: Waypoint::from(end),
            travel_mode: "WALK",
        };

        tracing::debug!(
            start_lat = start.lat,
            start_lng = start.lng,
            end_lat = end.lat,
            end_lng = end.lng,
            "Routes API request: ({:.4}, {:.4}) -> ({:.4}, {:.4})",
            start.lat, start.lng, end.lat, end.lng
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::RoutesApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Routes API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::RoutesApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ComputeRoutesResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutesApi(format!("Failed to parse response: {}", e)))?;

        let walk = parsed.into_walking_route()?;
        tracing::debug!(
            distance_km = %format!("{:.2}", walk.distance_km),
            duration_min = %format!("{:.0}", walk.duration_minutes),
            "Routes API response: {:.2}km, {:.0}min",
            walk.distance_km, walk.duration_minutes
        );
        Ok(walk)
    }
}

#[async_trait]
impl DistanceVerifier for GoogleRoutesClient {
    async fn verify(&self, start: &Coordinates, end: &Coordinates) -> Result<WalkingRoute> {
        self.get_walking_route(start, end).await
    }
}

// Routes API request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    location: Location,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl From<&Coordinates> for Waypoint {
    fn from(c: &Coordinates) -> Self {
        Waypoint {
            location: Location {
                lat_lng: LatLng {
                    latitude: c.lat,
                    longitude: c.lng,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    // The API answers `{}` when no route exists
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    #[serde(default)]
    distance_meters: f64,
    /// Duration string such as "1834s"
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPolyline {
    #[serde(default)]
    encoded_polyline: String,
}

impl ComputeRoutesResponse {
    fn into_walking_route(self) -> Result<WalkingRoute> {
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RoutesApi("No routes found".to_string()))?;

        let duration_seconds = route
            .duration
            .as_deref()
            .map(parse_duration_seconds)
            .transpose()?
            .unwrap_or(0.0);

        Ok(WalkingRoute {
            distance_km: route.distance_meters / 1000.0,
            duration_minutes: duration_seconds / 60.0,
            encoded_polyline: route
                .polyline
                .map(|p| p.encoded_polyline)
                .unwrap_or_default(),
        })
    }
}

/// Parse a protobuf Duration string ("1834s", "12.5s") into seconds.
fn parse_duration_seconds(raw: &str) -> Result<f64> {
    raw.trim()
        .trim_end_matches('s')
        .parse()
        .map_err(|_| AppError::RoutesApi(format!("Invalid duration '{}'", raw)))
}
