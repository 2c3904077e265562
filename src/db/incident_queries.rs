use crate::models::geo::BoundingBox;
use crate::models::{Coordinates, IncidentSummary};
use sqlx::PgPool;
use time::Date;

#[derive(sqlx::FromRow)]
struct IncidentCountRow {
    crash_count: i64,
    injury_count: i64,
    fatality_count: i64,
}

impl From<IncidentCountRow> for IncidentSummary {
    fn from(row: IncidentCountRow) -> Self {
        // Counts come from COUNT/SUM so they are never negative
        IncidentSummary {
            crash_count: row.crash_count.max(0) as u32,
            injury_count: row.injury_count.max(0) as u32,
            fatality_count: row.fatality_count.max(0) as u32,
        }
    }
}

/// Count crashes, injuries and fatalities within `radius_km` of `center`
/// since `since`. The bounding box hits the (latitude, longitude) index;
/// the haversine predicate trims the box corners.
pub async fn summarize_incidents_near(
    pool: &PgPool,
    center: &Coordinates,
    radius_km: f64,
    since: Date,
) -> Result<IncidentSummary, sqlx::Error> {
    let bbox = BoundingBox::from_center_radius(center, radius_km);

    let row = sqlx::query_as::<_, IncidentCountRow>(
        r#"
        SELECT
            COUNT(*)::BIGINT AS crash_count,
            COALESCE(SUM(injuries), 0)::BIGINT AS injury_count,
            COALESCE(SUM(fatalities), 0)::BIGINT AS fatality_count
        FROM crashes
        WHERE latitude BETWEEN $1 AND $2
          AND longitude BETWEEN $3 AND $4
          AND crash_date >= $5
          AND 6371.0 * 2 * ASIN(SQRT(
                POWER(SIN(RADIANS(latitude - $6) / 2), 2)
                + COS(RADIANS($6)) * COS(RADIANS(latitude))
                  * POWER(SIN(RADIANS(longitude - $7) / 2), 2)
              )) <= $8
        "#,
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lng)
    .bind(bbox.max_lng)
    .bind(since)
    .bind(center.lat)
    .bind(center.lng)
    .bind(radius_km)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// A crash record as ingested from the open-data feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashRecord {
    pub collision_id: i64,
    pub crash_date: Date,
    pub latitude: f64,
    pub longitude: f64,
    pub injuries: i32,
    pub fatalities: i32,
}

/// Insert a crash; returns false when the collision id already exists.
pub async fn insert_crash(pool: &PgPool, crash: &CrashRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO crashes (collision_id, crash_date, latitude, longitude, injuries, fatalities)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (collision_id) DO NOTHING
        "#,
    )
    .bind(crash.collision_id)
    .bind(crash.crash_date)
    .bind(crash.latitude)
    .bind(crash.longitude)
    .bind(crash.injuries)
    .bind(crash.fatalities)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_crashes(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM crashes")
        .fetch_one(pool)
        .await
}
