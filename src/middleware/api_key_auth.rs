use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::AppError;
use crate::models::{ApiKey, App, User};
use crate::util::extract_api_key;

/// Caller identity resolved from the Authorization header.
#[derive(Clone)]
pub struct ApiKeyContext {
    pub user: User,
    pub key: ApiKey,
}

impl ApiKeyContext {
    pub fn require_write(&self) -> Result<(), AppError> {
        if self.key.mode.can_write() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "API key mode '{}' cannot modify devices",
                self.key.mode.as_ref()
            )))
        }
    }

    /// The key's user must own the app, and a limited key must list it.
    pub fn can_access(&self, app: &App) -> bool {
        app.owner_id == self.user.id && self.key.allows_app(&app.app_id)
    }
}

pub async fn api_key_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (user, key) = {
        let raw_key = extract_api_key(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
        let conn = state
            .db
            .get()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        queries::get_user_by_api_key(&conn, raw_key)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or_else(|| {
                tracing::debug!("rejected unknown API key");
                StatusCode::UNAUTHORIZED
            })?
    };

    request.extensions_mut().insert(ApiKeyContext { user, key });
    Ok(next.run(request).await)
}
