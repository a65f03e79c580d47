use axum::extract::{Extension, State};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::middleware::ApiKeyContext;
use crate::models::{Platform, UpsertDevice};

use super::{StatusResponse, load_app, require_device_id};

#[derive(Debug, Deserialize)]
pub struct LinkDeviceRequest {
    pub app_id: String,
    pub device_id: String,
    /// Version name the device is running
    #[serde(default)]
    pub version_id: Option<String>,
    /// Channel to pin the device to
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub custom_id: Option<String>,
}

pub async fn link_device(
    State(state): State<AppState>,
    Extension(ctx): Extension<ApiKeyContext>,
    Json(input): Json<LinkDeviceRequest>,
) -> Result<Json<StatusResponse>> {
    ctx.require_write()?;

    let mut conn = state.db.get()?;
    let app = load_app(&conn, &ctx, &input.app_id)?;
    let device_id = require_device_id(&input.device_id)?;

    let channel_name = input
        .channel
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("missing_channel", "channel is required"))?;

    let channel = queries::get_channel_by_name(&conn, &app.app_id, channel_name)?.ok_or_else(|| {
        AppError::bad_request(
            "channel_not_found",
            format!("Channel {} not found in {}", channel_name, app.app_id),
        )
    })?;

    let upsert = UpsertDevice {
        version_name: input.version_id.clone(),
        platform: input.platform,
        custom_id: input.custom_id.clone(),
        ..Default::default()
    };

    queries::link_device(&mut conn, &app.app_id, &device_id, &upsert, &channel)?;

    tracing::info!(
        app_id = %app.app_id,
        device_id = %device_id,
        channel = %channel.name,
        "Linked device to channel"
    );

    Ok(Json(StatusResponse::ok()))
}
