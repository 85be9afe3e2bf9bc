//! Integration tests for the preview bridge.
//!
//! These tests verify the HTTP API endpoints work correctly.

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use lionel_train_card::services::{
    build_router, ApiResponse, CommandsResponse, ConfigResponse, DevicesResponse,
    SharedCardState, StatesResponse, WebServerConfig,
};
use lionel_train_card::{CardConfig, Phase, Service};

fn create_test_app(device: &str) -> (axum::Router, Arc<SharedCardState>) {
    let config = CardConfig::default().with_device(device);
    let state = Arc::new(SharedCardState::new(config).unwrap());
    let router = build_router(Arc::clone(&state), &WebServerConfig::default());
    (router, state)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

async fn view(app: &axum::Router) -> Value {
    let response = app.clone().oneshot(get("/api/view")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["success"], true);
    json["data"].clone()
}

#[tokio::test]
async fn test_get_view_defaults() {
    let (app, _state) = create_test_app("Test");
    let data = view(&app).await;

    assert_eq!(data["kind"], "panel");
    assert_eq!(data["title"], "Test");
    assert_eq!(data["connected"], false);
    assert_eq!(data["connection_label"], "Disconnected");
    assert_eq!(data["speed_label"], "0%");
    assert_eq!(data["direction_forward"], true);
    assert_eq!(data["motion_label"], "Stopped");
    assert_eq!(data["train_model"], "Generic");
    assert_eq!(data["announcements"].as_array().unwrap().len(), 7);
    assert_eq!(data["volumes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_unconfigured_view() {
    let (app, _state) = create_test_app("");
    let data = view(&app).await;
    assert_eq!(data["kind"], "unconfigured");
    assert!(data["message"].as_str().unwrap().contains("Select"));
}

#[tokio::test]
async fn test_push_states() {
    let (app, state) = create_test_app("Test");

    let snapshot = r#"{
        "number.test_throttle": {"state": "45"},
        "switch.test_lights": {"state": "on"},
        "binary_sensor.test_connection": {"state": "on"},
        "sensor.test_train_model": {"state": "Polar Express"}
    }"#;
    let response = app.clone().oneshot(post("/api/states", snapshot)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: ApiResponse<StatesResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    let data = json.data.unwrap();
    assert_eq!(data.entities, 4);
    assert_eq!(data.change, "rebuild");

    let data = view(&app).await;
    assert_eq!(data["speed_label"], "45%");
    assert_eq!(data["lights_on"], true);
    assert_eq!(data["connection_label"], "Connected");
    assert_eq!(data["motion_label"], "Moving Forward");
    assert_eq!(data["announcements"][1]["label"], "Polar Express");

    let phase = state.with_card(|card| card.animator().phase());
    assert_eq!(phase, Phase::Running);
}

#[tokio::test]
async fn test_push_states_invalid() {
    let (app, _state) = create_test_app("Test");
    let response = app.oneshot(post("/api/states", "not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json: ApiResponse<()> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!json.success);
    assert!(json.error.unwrap().contains("Invalid state snapshot"));
}

#[tokio::test]
async fn test_control_records_one_command() {
    let (app, _state) = create_test_app("Test");

    let response = app
        .clone()
        .oneshot(post("/api/control", r#"{"control": "horn"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/commands")).await.unwrap();
    let json: ApiResponse<CommandsResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    let commands = json.data.unwrap().commands;
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].service, Service::Press);
    assert_eq!(commands[0].entity_id, "button.test_horn");

    // drained
    let response = app.oneshot(get("/api/commands")).await.unwrap();
    let json: ApiResponse<CommandsResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(json.data.unwrap().commands.is_empty());
}

#[tokio::test]
async fn test_control_with_value_and_key() {
    let (app, state) = create_test_app("Polar Express");

    for body in [
        r#"{"control": "throttle", "value": 40}"#,
        r#"{"control": "volume", "key": "horn", "value": 5}"#,
        r#"{"control": "announcement", "key": "water_and_fire"}"#,
        r#"{"control": "toggle_settings"}"#,
    ] {
        let response = app.clone().oneshot(post("/api/control", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{body}");
    }

    let commands = state.drain_commands();
    let ids: Vec<&str> = commands.iter().map(|c| c.entity_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "number.polar_express_throttle",
            "number.polar_express_horn_volume",
            "button.polar_express_announcement_water_and_fire",
        ]
    );
    assert_eq!(commands[0].value, Some(40.0));
    assert_eq!(commands[1].value, Some(5.0));

    let data = view(&app).await;
    assert_eq!(data["speed_label"], "40%");
    assert_eq!(data["settings_expanded"], true);
}

#[tokio::test]
async fn test_control_validation() {
    let (app, state) = create_test_app("Test");

    for body in [
        r#"{"control": "warp_drive"}"#,
        r#"{"control": "throttle"}"#,
        r#"{"control": "announcement", "key": "unknown"}"#,
        r#"{"value": 3}"#,
    ] {
        let response = app.clone().oneshot(post("/api/control", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    assert!(state.drain_commands().is_empty());
}

#[tokio::test]
async fn test_devices() {
    let (app, _state) = create_test_app("Test");

    let response = app.clone().oneshot(get("/api/devices")).await.unwrap();
    let json: ApiResponse<DevicesResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    let data = json.data.unwrap();
    assert!(data.devices.is_empty());
    assert_eq!(data.options[1].label, "No Lionel trains found");

    let snapshot = r#"{
        "number.polar_express_throttle": {"state": "0"},
        "number.polar_express_bell_volume": {"state": "2"},
        "number.big_boy_throttle": {"state": "0"}
    }"#;
    app.clone().oneshot(post("/api/states", snapshot)).await.unwrap();

    let response = app.oneshot(get("/api/devices")).await.unwrap();
    let json: ApiResponse<DevicesResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json.data.unwrap().devices, vec!["Big Boy", "Polar Express"]);
}

#[tokio::test]
async fn test_set_config() {
    let (app, _state) = create_test_app("Test");

    let body = r#"{"type": "custom:lionel-train-card", "device": "Big Boy", "name": "Yard", "track": "stadium"}"#;
    let response = app.clone().oneshot(post("/api/config", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: ApiResponse<ConfigResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json.data.unwrap().title, "Yard");

    app.clone()
        .oneshot(post("/api/control", r#"{"control": "bell"}"#))
        .await
        .unwrap();
    let response = app.oneshot(get("/api/commands")).await.unwrap();
    let json: ApiResponse<CommandsResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json.data.unwrap().commands[0].entity_id, "button.big_boy_bell");
}

#[tokio::test]
async fn test_set_config_validation() {
    let (app, state) = create_test_app("Test");

    let body = r#"{"device": "Test", "animation": {"step_per_frame": 1.0}}"#;
    let response = app.oneshot(post("/api/config", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.config().animation, CardConfig::default().animation);
}

#[tokio::test]
async fn test_frames_advance_only_while_moving() {
    let (app, state) = create_test_app("Test");
    assert!(state.tick_frame().is_none());

    app.clone()
        .oneshot(post("/api/states", r#"{"number.test_throttle": {"state": "100"}}"#))
        .await
        .unwrap();
    let first = state.tick_frame().unwrap().progress;
    assert!(first > 0.0);

    app.oneshot(post("/api/states", r#"{"number.test_throttle": {"state": "0"}}"#))
        .await
        .unwrap();
    assert!(state.tick_frame().is_none());
    let held = state.with_card(|card| card.animator().progress());
    assert_eq!(held, first);
}

#[tokio::test]
async fn test_index_served() {
    let (app, _state) = create_test_app("Test");
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Lionel Train Card"));
}

#[tokio::test]
async fn test_not_found() {
    let (app, _state) = create_test_app("Test");
    let response = app.oneshot(get("/api/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
