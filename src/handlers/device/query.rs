use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Query};
use crate::middleware::ApiKeyContext;
use crate::models::DeviceWithChannel;

use super::{load_app, require_device_id};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Legacy list shape: `{devices, total, page, limit}`
    #[default]
    V1,
    /// List is a bare JSON array
    V2,
}

#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub api: ApiVersion,
    /// Zero-based page index
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DevicePage {
    pub devices: Vec<DeviceWithChannel>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeviceResponse {
    One(DeviceWithChannel),
    List(Vec<DeviceWithChannel>),
    Page(DevicePage),
}

pub async fn get_devices(
    State(state): State<AppState>,
    Extension(ctx): Extension<ApiKeyContext>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<DeviceResponse>> {
    let conn = state.db.get()?;
    let app = load_app(&conn, &ctx, &query.app_id)?;

    if let Some(raw) = query.device_id.as_deref() {
        let device_id = require_device_id(raw)?;
        let device = queries::get_device(&conn, &app.app_id, &device_id)?.ok_or_else(|| {
            AppError::bad_request(
                "device_not_found",
                format!("Device {} not found in {}", device_id, app.app_id),
            )
        })?;
        return Ok(Json(DeviceResponse::One(device)));
    }

    let page = query.page.unwrap_or(0);
    if page < 0 {
        return Err(AppError::bad_request("invalid_query", "page must be >= 0"));
    }
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let offset = page.saturating_mul(limit);
    let devices = queries::list_devices_for_app(&conn, &app.app_id, limit, offset)?;

    Ok(Json(match query.api {
        ApiVersion::V2 => DeviceResponse::List(devices),
        ApiVersion::V1 => DeviceResponse::Page(DevicePage {
            total: queries::count_devices_for_app(&conn, &app.app_id)?,
            devices,
            page,
            limit,
        }),
    }))
}
