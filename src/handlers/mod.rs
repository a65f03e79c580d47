pub mod device;
pub mod rpc;

use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::middleware::{api_key_auth, service_key_auth};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState) -> Router<AppState> {
    let device_routes = Router::new()
        .route(
            "/device",
            post(device::link_device)
                .get(device::get_devices)
                .delete(device::unlink_device),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), api_key_auth));

    let router = Router::new()
        .route("/health", get(health))
        .merge(device_routes);

    // Seeding wipes the database, so it only exists when a service key is configured
    if state.service_key.is_some() {
        router.merge(
            Router::new()
                .route("/rpc/{name}", post(rpc::call_procedure))
                .route_layer(middleware::from_fn_with_state(state, service_key_auth)),
        )
    } else {
        router
    }
}

/// Full application with tracing and CORS layers, ready to serve.
pub fn app(state: AppState) -> Router {
    router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
