//! Shared utility functions for the devicelink service.

use axum::http::HeaderMap;

/// Extract the API key from the Authorization header.
///
/// Accepts both a raw key and `Bearer <key>`. Returns None if the header is
/// missing, not valid UTF-8, or empty after trimming.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    let key = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!key.is_empty()).then_some(key)
}

/// Extract the service key used by the seeding procedures.
///
/// Tries the `apikey` header first, then falls back to the Authorization header.
pub fn extract_service_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| extract_api_key(headers))
}
