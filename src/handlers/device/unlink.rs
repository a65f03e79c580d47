use axum::extract::{Extension, State};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::ApiKeyContext;

use super::{StatusResponse, load_app, require_device_id};

#[derive(Debug, Deserialize)]
pub struct UnlinkDeviceRequest {
    pub app_id: String,
    pub device_id: String,
}

/// Remove a device's channel override. Succeeds whether or not one existed.
pub async fn unlink_device(
    State(state): State<AppState>,
    Extension(ctx): Extension<ApiKeyContext>,
    Json(input): Json<UnlinkDeviceRequest>,
) -> Result<Json<StatusResponse>> {
    ctx.require_write()?;

    let conn = state.db.get()?;
    let app = load_app(&conn, &ctx, &input.app_id)?;
    let device_id = require_device_id(&input.device_id)?;

    let removed = queries::unlink_device(&conn, &app.app_id, &device_id)?;
    tracing::info!(app_id = %app.app_id, device_id = %device_id, removed, "Unlinked device");

    Ok(Json(StatusResponse::ok()))
}
