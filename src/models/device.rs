use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Electron,
}

/// An app installation, keyed by `(app_id, device_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub app_id: String,
    pub device_id: String,
    /// Version name last reported by the device
    pub version_name: Option<String>,
    pub platform: Option<Platform>,
    pub plugin_version: Option<String>,
    pub os_version: Option<String>,
    pub custom_id: Option<String>,
    pub is_prod: bool,
    pub is_emulator: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Device as returned by `GET /device`, including its channel override.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceWithChannel {
    #[serde(flatten)]
    pub device: Device,
    /// Name of the channel the device is pinned to, if any
    pub channel: Option<String>,
}

/// Fields written when a device is linked. Missing values keep what is stored.
#[derive(Debug, Clone, Default)]
pub struct UpsertDevice {
    pub version_name: Option<String>,
    pub platform: Option<Platform>,
    pub plugin_version: Option<String>,
    pub os_version: Option<String>,
    pub custom_id: Option<String>,
    pub is_prod: Option<bool>,
    pub is_emulator: Option<bool>,
}

/// Device ids are stored and matched exactly as sent, minus surrounding whitespace.
pub fn normalize_device_id(device_id: &str) -> String {
    device_id.trim().to_string()
}
