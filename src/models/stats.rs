use serde::{Deserialize, Serialize};

/// Monthly active devices for one app on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMau {
    pub app_id: String,
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub mau: i64,
}

/// Per-version update counters for one app on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyVersion {
    pub app_id: String,
    pub date: String,
    pub version_name: String,
    pub get: i64,
    pub install: i64,
    pub uninstall: i64,
    pub fail: i64,
}
