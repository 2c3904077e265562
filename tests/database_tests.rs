use runsafe::db::incident_queries::{count_crashes, insert_crash, CrashRecord};
use runsafe::db::{lookback_cutoff, IncidentStore, PgIncidentStore};
use runsafe::models::{Coordinates, IncidentSummary};
use serial_test::serial;

mod common;

fn crash(collision_id: i64, lat: f64, lng: f64, days_ago: u32, injuries: i32) -> CrashRecord {
    CrashRecord {
        collision_id,
        crash_date: lookback_cutoff(days_ago),
        latitude: lat,
        longitude: lng,
        injuries,
        fatalities: 0,
    }
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_insert_is_idempotent() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_db(&pool).await;

    let record = crash(1, 40.7296, -73.9834, 3, 1);
    assert!(insert_crash(&pool, &record).await.unwrap());
    assert!(!insert_crash(&pool, &record).await.unwrap());
    assert_eq!(count_crashes(&pool).await.unwrap(), 1);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_incident_summary_respects_radius_and_window() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_db(&pool).await;

    // Union Square and ~200m away
    insert_crash(&pool, &crash(10, 40.7359, -73.9911, 5, 2)).await.unwrap();
    insert_crash(&pool, &crash(11, 40.7377, -73.9911, 10, 1)).await.unwrap();
    // Same spot, outside a 60 day lookback
    insert_crash(&pool, &crash(12, 40.7359, -73.9911, 90, 4)).await.unwrap();
    // Central Park, ~5km away
    insert_crash(&pool, &crash(13, 40.7829, -73.9654, 1, 3)).await.unwrap();

    let store = PgIncidentStore::new(pool.clone());
    let center = Coordinates::new(40.7359, -73.9911).unwrap();

    let summary = store.incident_summary(&center, 0.5, 60).await.unwrap();
    assert_eq!(summary, IncidentSummary::new(2, 3, 0));

    let wider = store.incident_summary(&center, 0.5, 120).await.unwrap();
    assert_eq!(wider, IncidentSummary::new(3, 7, 0));

    assert_eq!(store.count().await.unwrap(), 4);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_empty_area_has_zero_counts() {
    let pool = common::setup_test_db().await;
    common::cleanup_test_db(&pool).await;

    let store = PgIncidentStore::new(pool.clone());
    let center = Coordinates::new(40.7296, -73.9834).unwrap();

    let summary = store.incident_summary(&center, 0.5, 60).await.unwrap();
    assert_eq!(summary, IncidentSummary::default());
}
