use axum::http::StatusCode;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_link_device_returns_ok() {
    let (app, _state) = test_app();

    let (status, body) = link(&app, "test_device", NO_ACCESS_CHANNEL).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_linked_device_reports_channel_and_version() {
    let (app, _state) = test_app();
    link(&app, "test_device", NO_ACCESS_CHANNEL).await;

    let (status, body) = get_device(&app, "test_device").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_id"], "test_device");
    assert_eq!(body["channel"], NO_ACCESS_CHANNEL);
    assert_eq!(body["version_name"], "1.0.0");
}

#[tokio::test]
async fn test_link_invalid_app_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/device",
        Some(ALL_KEY),
        Some(json!({ "app_id": "invalid_app", "device_id": "test_device" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_app_id");
}

#[tokio::test]
async fn test_link_app_of_another_user_looks_like_unknown_app() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/device",
        Some(ALL_KEY),
        Some(json!({
            "app_id": OTHER_APP_ID,
            "device_id": "test_device",
            "channel": NO_ACCESS_CHANNEL,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_app_id");
}

#[tokio::test]
async fn test_link_unknown_channel_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = link(&app, "test_device", "beta").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "channel_not_found");

    // Nothing was written
    let (status, _) = get_device(&app, "test_device").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_link_without_channel_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/device",
        Some(ALL_KEY),
        Some(json!({ "app_id": DEMO_APP_ID, "device_id": "test_device", "version_id": "1.0.0" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_channel");
}

#[tokio::test]
async fn test_link_blank_device_id_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = link(&app, "   ", NO_ACCESS_CHANNEL).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing_device_id");
}

#[tokio::test]
async fn test_link_malformed_body_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/device",
        Some(ALL_KEY),
        Some(json!({ "device_id": "test_device" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_json_body");
}

#[tokio::test]
async fn test_device_id_keeps_its_case() {
    let (app, _state) = test_app();

    let (status, _) = link(&app, "Device-ABC", NO_ACCESS_CHANNEL).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_device(&app, "Device-ABC").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_id"], "Device-ABC");
    assert_eq!(body["channel"], NO_ACCESS_CHANNEL);

    // Surrounding whitespace is ignored, case is not
    let (status, body) = get_device(&app, "%20Device-ABC%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_id"], "Device-ABC");

    let (status, body) = get_device(&app, "device-abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "device_not_found");
}

#[tokio::test]
async fn test_relink_moves_device_to_new_channel() {
    let (app, _state) = test_app();

    link(&app, SEEDED_DEVICE_ID, NO_ACCESS_CHANNEL).await;
    let (status, _) = link(&app, SEEDED_DEVICE_ID, PRODUCTION_CHANNEL).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_device(&app, SEEDED_DEVICE_ID).await;
    assert_eq!(body["channel"], PRODUCTION_CHANNEL);
    // Re-linking does not duplicate the device
    let (_, list) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&api=v2", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}
