use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use runsafe::models::IncidentSummary;
use runsafe::AppState;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{build_planner, test_start, FakeClassifier, FakeIncidentStore, FakeVerifier};

fn setup_test_app(store: FakeIncidentStore) -> axum::Router {
    let start = test_start();
    let verifier = Arc::new(FakeVerifier::new(
        start,
        5.0,
        vec![(
            0.4,
            [
                Some(96.0),
                Some(94.0),
                Some(97.0),
                Some(60.0),
                Some(91.0),
                Some(40.0),
                Some(30.0),
                Some(20.0),
            ],
        )],
    ));
    let store = Arc::new(store);
    let planner = build_planner(FakeClassifier::default(), verifier, store.clone());

    let state = Arc::new(AppState {
        incident_store: store,
        planner,
    });

    runsafe::routes::create_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn loop_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/routes/loop")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = setup_test_app(FakeIncidentStore::uniform(IncidentSummary::default()));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["database"], "ok");
    assert_eq!(json["checks"]["crash_count"], 1234);
}

#[tokio::test]
async fn test_health_check_reports_store_failure() {
    let app = setup_test_app(FakeIncidentStore::failing());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert!(json["checks"]["database"]["error"].is_string());
}

#[tokio::test]
async fn test_loop_route_endpoint_validation() {
    let app = setup_test_app(FakeIncidentStore::uniform(IncidentSummary::default()));

    for distance in [0.0, -3.0, 51.0] {
        let response = app
            .clone()
            .oneshot(loop_request(json!({
                "start_point": {"lat": 40.7296, "lng": -73.9834},
                "distance_km": distance
            })))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "distance {} should be rejected",
            distance
        );
        let json = body_json(response).await;
        assert_eq!(json["error"], "Bad Request");
        assert!(json["message"].as_str().unwrap().contains("distance_km"));
    }

    let response = app
        .oneshot(loop_request(json!({
            "start_point": {"lat": 123.0, "lng": -73.9834},
            "distance_km": 5.0
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_loop_route_response_shape() {
    let app = setup_test_app(FakeIncidentStore::uniform(IncidentSummary::new(2, 1, 0)));

    let response = app
        .oneshot(loop_request(json!({
            "start_point": {"lat": 40.7296, "lng": -73.9834},
            "distance_km": 5.0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["search"]["termination"], "good_phase1");
    assert_eq!(json["search"]["candidates_generated"], 8);
    assert_eq!(json["search"]["verification_calls"], 8);

    let routes = json["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 4);

    let first = &routes[0];
    assert_eq!(first["direction"], "East");
    assert_eq!(first["phase"], 1);
    assert_eq!(first["distance"]["target_distance"], 5.0);
    assert_eq!(first["distance"]["one_way_planned"], 2.0);
    assert!(first["endpoint"]["lat"].is_number());
    assert!(!first["polyline"].as_str().unwrap().is_empty());
    assert!(first["combined_score"].is_number());
    assert_eq!(first["safety_analysis"]["status"], "scored");
    assert_eq!(first["safety_analysis"]["safety_level"], "Very Safe");
    assert!(first["safety_analysis"]["dangerous_segments"].is_array());
}

#[tokio::test]
async fn test_unavailable_safety_in_response() {
    let app = setup_test_app(FakeIncidentStore::failing());

    let response = app
        .oneshot(loop_request(json!({
            "start_point": {"lat": 40.7296, "lng": -73.9834},
            "distance_km": 5.0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let first = &json["routes"][0];
    assert!(first["combined_score"].is_null());
    assert_eq!(first["safety_analysis"]["status"], "unavailable");
    assert!(first["safety_analysis"]["reason"].is_string());
}
