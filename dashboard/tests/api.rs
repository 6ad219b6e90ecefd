mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{fleet_fixture, DataDir};
use dashboard::{rest, CsvSource, Engine, EngineConfig};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(dir: &DataDir) -> Router {
    let engine = Engine::new(
        Arc::new(CsvSource::new(dir.path())),
        EngineConfig::default(),
    );
    rest::create_router(engine)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_fleet_endpoint() {
    let dir = fleet_fixture();
    let (status, body) = get(app(&dir), "/api/v1/fleet").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_hours"], 24);
    assert_eq!(body["now"], "2024-01-11 10:00:00");
    let machines = body["machines"].as_array().unwrap();
    assert_eq!(machines.len(), 2);
    assert_eq!(machines[0]["machine_id"], "M2");
    assert_eq!(machines[0]["uptime_pct"], 50.0);
    assert_eq!(machines[0]["last_downtime"], Value::Null);
    assert_eq!(machines[1]["last_downtime"], "2024-01-05 04:00:00");
    assert_eq!(body["plants"]["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_machine_endpoint() {
    let dir = fleet_fixture();
    let (status, body) = get(app(&dir), "/api/v1/machines/M1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_status"], "Running");
    assert_eq!(body["uptime_pct"], 100.0);
    assert_eq!(body["remaining_life_hours"], 38750.0);
    assert_eq!(body["chart"]["running"].as_array().unwrap().len(), 49);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 20);
    assert_eq!(events[0]["timestamp"], "2024-01-11 10:00:00");
    assert_eq!(events[0]["status"], "Running");
}

#[tokio::test]
async fn test_machine_not_found() {
    let dir = fleet_fixture();
    let (status, body) = get(app(&dir), "/api/v1/machines/M3").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "machine not found");
    assert_eq!(body["machine_id"], "M3");
}

#[tokio::test]
async fn test_machines_and_plants_endpoints() {
    let dir = fleet_fixture();

    let (status, body) = get(app(&dir), "/api/v1/machines").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[1]["expected_life_hours"], 40000.0);

    let (status, body) = get(app(&dir), "/api/v1/plants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"][0], "plant");
    assert_eq!(body["rows"][1][4], "idle line");
}

#[tokio::test]
async fn test_unavailable_source_is_generic_failure() {
    let dir = DataDir::new();
    let (status, body) = get(app(&dir), "/api/v1/fleet").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
