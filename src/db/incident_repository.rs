use crate::error::Result;
use crate::models::{Coordinates, IncidentSummary};
use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

/// Read-only access to historical incidents. Implementations must tolerate
/// concurrent reads; the safety pipeline shares one handle across requests.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn incident_summary(
        &self,
        center: &Coordinates,
        radius_km: f64,
        days_back: u32,
    ) -> Result<IncidentSummary>;

    /// Total stored incidents, used by the health check.
    async fn count(&self) -> Result<i64>;
}

pub struct PgIncidentStore {
    pool: sqlx::PgPool,
}

impl PgIncidentStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

/// First day included in a `days_back` lookback window.
pub fn lookback_cutoff(days_back: u32) -> time::Date {
    (OffsetDateTime::now_utc() - Duration::days(i64::from(days_back))).date()
}

#[async_trait]
impl IncidentStore for PgIncidentStore {
    async fn incident_summary(
        &self,
        center: &Coordinates,
        radius_km: f64,
        days_back: u32,
    ) -> Result<IncidentSummary> {
        Ok(super::incident_queries::summarize_incidents_near(
            &self.pool,
            center,
            radius_km,
            lookback_cutoff(days_back),
        )
        .await?)
    }

    async fn count(&self) -> Result<i64> {
        Ok(super::incident_queries::count_crashes(&self.pool).await?)
    }
}
