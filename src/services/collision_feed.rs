use crate::db::incident_queries::CrashRecord;
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use time::macros::format_description;
use time::Date;

pub const NYC_COLLISIONS_URL: &str = "https://data.cityofnewyork.us/resource/h9gi-nx95.json";

/// Client for the NYC motor vehicle collisions open-data feed (Socrata).
pub struct CollisionFeedClient {
    client: Client,
    base_url: String,
}

impl CollisionFeedClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// Fetch up to `limit` geolocated collisions on or after `since`, newest first.
    pub async fn fetch_since(&self, since: Date, limit: usize) -> Result<Vec<FeedCollision>> {
        let filter = format!(
            "latitude IS NOT NULL AND longitude IS NOT NULL AND crash_date >= '{}'",
            since
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("$limit", limit.to_string()),
                ("$order", "crash_date DESC".to_string()),
                ("$where", filter),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Collision feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Collision feed HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse collision feed: {}", e)))
    }
}

/// One row of the feed. Socrata serializes every column as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedCollision {
    pub collision_id: Option<String>,
    pub crash_date: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub number_of_persons_injured: Option<String>,
    pub number_of_persons_killed: Option<String>,
}

impl FeedCollision {
    /// Convert to a storable record. Rows without an id, a date or a usable
    /// location are skipped; missing casualty counts read as zero.
    pub fn to_record(&self) -> Option<CrashRecord> {
        let collision_id = self.collision_id.as_deref()?.trim().parse().ok()?;
        let crash_date = parse_feed_date(self.crash_date.as_deref()?)?;
        let latitude: f64 = self.latitude.as_deref()?.trim().parse().ok()?;
        let longitude: f64 = self.longitude.as_deref()?.trim().parse().ok()?;

        // The feed geocodes unknown locations to (0, 0)
        if latitude == 0.0 || longitude == 0.0 {
            return None;
        }

        Some(CrashRecord {
            collision_id,
            crash_date,
            latitude,
            longitude,
            injuries: parse_count(self.number_of_persons_injured.as_deref()),
            fatalities: parse_count(self.number_of_persons_killed.as_deref()),
        })
    }
}

/// Floating timestamps like "2024-12-15T00:00:00.000"; only the date is kept.
fn parse_feed_date(raw: &str) -> Option<Date> {
    let date_part = raw.get(..10)?;
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_count(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn collision(json: &str) -> FeedCollision {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_feed_row_conversion() {
        let row = collision(
            r#"{"collision_id":"4781345","crash_date":"2024-12-15T00:00:00.000",
                "latitude":"40.72981","longitude":"-73.98412",
                "number_of_persons_injured":"2","number_of_persons_killed":"0",
                "borough":"MANHATTAN"}"#,
        );
        let record = row.to_record().unwrap();

        assert_eq!(record.collision_id, 4781345);
        assert_eq!(
            record.crash_date,
            Date::from_calendar_date(2024, Month::December, 15).unwrap()
        );
        assert_eq!(record.latitude, 40.72981);
        assert_eq!(record.injuries, 2);
        assert_eq!(record.fatalities, 0);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let row = collision(
            r#"{"collision_id":"1","crash_date":"2025-01-02T00:00:00.000",
                "latitude":"40.7","longitude":"-73.9"}"#,
        );
        let record = row.to_record().unwrap();
        assert_eq!(record.injuries, 0);
        assert_eq!(record.fatalities, 0);
    }

    #[test]
    fn test_unusable_rows_are_skipped() {
        // No location
        assert!(collision(r#"{"collision_id":"1","crash_date":"2025-01-02T00:00:00.000"}"#)
            .to_record()
            .is_none());
        // Null island
        assert!(collision(
            r#"{"collision_id":"2","crash_date":"2025-01-02T00:00:00.000",
                "latitude":"0","longitude":"0"}"#
        )
        .to_record()
        .is_none());
        // Bad date
        assert!(collision(
            r#"{"collision_id":"3","crash_date":"yesterday","latitude":"40.7","longitude":"-73.9"}"#
        )
        .to_record()
        .is_none());
    }
}
