use crate::constants::DEFAULT_IGNORE_KEYWORDS;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, EndpointClassification};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const GOOGLE_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Decides whether a projected endpoint is somewhere a runner can reach.
#[async_trait]
pub trait EndpointClassifier: Send + Sync {
    async fn classify(&self, point: &Coordinates) -> Result<EndpointClassification>;
}

/// Reverse-geocodes endpoints and rejects addresses that indicate water,
/// unnamed roads or places outside the covered area.
#[derive(Clone)]
pub struct GoogleGeocodingClassifier {
    client: Client,
    api_key: String,
    base_url: String,
    ignore_keywords: Vec<String>,
}

impl GoogleGeocodingClassifier {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_config(
            api_key,
            GOOGLE_GEOCODING_BASE_URL.to_string(),
            DEFAULT_IGNORE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            timeout,
        )
    }

    pub fn with_config(
        api_key: String,
        base_url: String,
        ignore_keywords: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GoogleGeocodingClassifier {
            client,
            api_key,
            base_url,
            ignore_keywords,
        })
    }

    /// Classify a formatted address against the ignore list.
    pub fn classify_address(&self, address: &str) -> EndpointClassification {
        let matched = self
            .ignore_keywords
            .iter()
            .find(|keyword| address.contains(keyword.as_str()));

        EndpointClassification {
            valid: matched.is_none(),
            label: address.to_string(),
        }
    }
}

#[async_trait]
impl EndpointClassifier for GoogleGeocodingClassifier {
    async fn classify(&self, point: &Coordinates) -> Result<EndpointClassification> {
        let latlng = format!("{},{}", point.lat, point.lng);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("latlng", latlng.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Geocoding(format!("HTTP {}", status)));
        }

        let parsed: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Failed to parse response: {}", e)))?;

        match parsed.first_address() {
            Some(address) => Ok(self.classify_address(address)),
            None => {
                tracing::debug!(
                    status = %parsed.status,
                    "No address found for ({:.4}, {:.4})",
                    point.lat, point.lng
                );
                Ok(EndpointClassification {
                    valid: false,
                    label: "No address found".to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl GeocodeResponse {
    fn first_address(&self) -> Option<&str> {
        if self.status != "OK" {
            return None;
        }
        self.results.first().map(|r| r.formatted_address.as_str())
    }
}
