use axum::http::StatusCode;

use crate::common::*;

#[tokio::test]
async fn test_list_devices_v2_is_array() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&api=v2", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let devices = body.as_array().expect("v2 list should be a JSON array");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["device_id"], SEEDED_DEVICE_ID);
    assert!(devices[0]["channel"].is_null());
}

#[tokio::test]
async fn test_list_devices_legacy_is_paged_envelope() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 0);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["devices"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_devices_for_app_without_devices_is_empty_array() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&api=v2", OTHER_APP_ID),
        Some(OTHER_USER_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_devices_paginates() {
    let (app, _state) = test_app();
    for id in ["device-a", "device-b", "device-c"] {
        let (status, _) = link(&app, id, NO_ACCESS_CHANNEL).await;
        assert_eq!(status, StatusCode::OK);
    }

    let page = |n: i64| format!("/device?app_id={}&api=v2&limit=3&page={}", DEMO_APP_ID, n);

    let (_, first) = send(&app, "GET", &page(0), Some(ALL_KEY), None).await;
    let (_, second) = send(&app, "GET", &page(1), Some(ALL_KEY), None).await;
    let (_, third) = send(&app, "GET", &page(2), Some(ALL_KEY), None).await;

    assert_eq!(first.as_array().unwrap().len(), 3);
    assert_eq!(second.as_array().unwrap().len(), 1);
    assert!(third.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_page_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&api=v2&page=-1", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_query");
}

#[tokio::test]
async fn test_get_specific_device() {
    let (app, _state) = test_app();

    let (status, body) = get_device(&app, SEEDED_DEVICE_ID).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_id"], SEEDED_DEVICE_ID);
    assert_eq!(body["app_id"], DEMO_APP_ID);
    assert_eq!(body["version_name"], SEEDED_DEVICE_VERSION);
    assert_eq!(body["platform"], "android");
}

#[tokio::test]
async fn test_list_invalid_app_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        "/device?app_id=invalid_app&api=v2",
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_app_id");
}

#[tokio::test]
async fn test_get_invalid_device_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&device_id=invalid_device", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "device_not_found");

    let (status, _) = get_device(&app, "invalid_device").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_api_version_returns_400() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/device?app_id={}&api=v9", DEMO_APP_ID),
        Some(ALL_KEY),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_query");
}

#[tokio::test]
async fn test_missing_app_id_returns_400() {
    let (app, _state) = test_app();

    let (status, _) = send(&app, "GET", "/device?api=v2", Some(ALL_KEY), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_needs_no_api_key() {
    let (app, _state) = test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
