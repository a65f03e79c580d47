use axum::http::StatusCode;
use serde_json::json;

use crate::common::*;

async fn unlink(
    app: &axum::Router,
    app_id: &str,
    device_id: &str,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "DELETE",
        "/device",
        Some(ALL_KEY),
        Some(json!({ "device_id": device_id, "app_id": app_id })),
    )
    .await
}

#[tokio::test]
async fn test_unlink_linked_device() {
    let (app, _state) = test_app();
    link(&app, "test_device", NO_ACCESS_CHANNEL).await;

    let (status, body) = unlink(&app, DEMO_APP_ID, "test_device").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // The device stays known, only the override is gone
    let (status, body) = get_device(&app, "test_device").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["channel"].is_null());
}

#[tokio::test]
async fn test_unlink_device_that_was_never_linked() {
    let (app, _state) = test_app();

    let (status, body) = unlink(&app, DEMO_APP_ID, "test_device").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unlink_unknown_device_is_ok() {
    let (app, _state) = test_app();

    let (status, body) = unlink(&app, DEMO_APP_ID, "invalid_device").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unlink_is_idempotent() {
    let (app, _state) = test_app();
    link(&app, "test_device", PRODUCTION_CHANNEL).await;

    for _ in 0..2 {
        let (status, body) = unlink(&app, DEMO_APP_ID, "test_device").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}

#[tokio::test]
async fn test_unlink_invalid_app_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = unlink(&app, "invalid_app", "test_device").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_app_id");
}
