use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use devicelink::db::{AppState, create_memory_pool};
use devicelink::handlers;

use crate::common::*;

async fn call_rpc(app: &axum::Router, name: &str, header: Option<(&str, &str)>) -> StatusCode {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/rpc/{}", name))
        .header("Content-Type", "application/json");
    if let Some((key, value)) = header {
        builder = builder.header(key, value);
    }
    app.clone()
        .oneshot(builder.body(Body::from("{}")).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_rpc_requires_service_key() {
    let (app, _state) = test_app();

    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", None).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", Some(("apikey", "wrong-key"))).await,
        StatusCode::UNAUTHORIZED
    );
    // The device API key is not a service key
    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", Some(("Authorization", ALL_KEY))).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_rpc_accepts_apikey_header_and_bearer() {
    let (app, _state) = test_app();

    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", Some(("apikey", TEST_SERVICE_KEY))).await,
        StatusCode::NO_CONTENT
    );
    let bearer = format!("Bearer {}", TEST_SERVICE_KEY);
    assert_eq!(
        call_rpc(&app, "reset_and_seed_stats_data", Some(("Authorization", bearer.as_str()))).await,
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn test_unknown_procedure_returns_404() {
    let (app, _state) = test_app();

    assert_eq!(
        call_rpc(&app, "drop_everything", Some(("apikey", TEST_SERVICE_KEY))).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_rpc_not_mounted_without_service_key() {
    let state = AppState {
        db: create_memory_pool().unwrap(),
        service_key: None,
    };
    let app = handlers::app(state);

    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", Some(("apikey", TEST_SERVICE_KEY))).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_reset_discards_linked_devices() {
    let (app, _state) = test_app();
    let (status, _) = link(&app, "test_device", NO_ACCESS_CHANNEL).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        call_rpc(&app, "reset_and_seed_data", Some(("apikey", TEST_SERVICE_KEY))).await,
        StatusCode::NO_CONTENT
    );

    let (status, _) = get_device(&app, "test_device").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_device(&app, SEEDED_DEVICE_ID).await;
    assert_eq!(status, StatusCode::OK);
}
