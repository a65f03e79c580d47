//! `/device`: link devices to channels, look them up, unlink them.

mod link;
mod query;
mod unlink;

pub use link::*;
pub use query::*;
pub use unlink::*;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::middleware::ApiKeyContext;
use crate::models::{App, normalize_device_id};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Resolve an app the caller may act on.
///
/// Unknown apps and apps the key cannot reach get the same 400 so callers
/// cannot probe for app ids they do not own.
fn load_app(conn: &Connection, ctx: &ApiKeyContext, app_id: &str) -> Result<App> {
    let app = queries::get_app(conn, app_id)?.ok_or_else(|| AppError::invalid_app_id(app_id))?;

    if !ctx.can_access(&app) {
        return Err(AppError::invalid_app_id(app_id));
    }

    Ok(app)
}

fn require_device_id(raw: &str) -> Result<String> {
    let device_id = normalize_device_id(raw);
    if device_id.is_empty() {
        return Err(AppError::bad_request(
            "missing_device_id",
            "device_id must not be empty",
        ));
    }
    Ok(device_id)
}
