use serde::{Deserialize, Serialize};

/// A named release track within an app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub app_id: String,
    pub name: String,
    /// Version served on this channel (app_versions.id)
    pub version_id: Option<String>,
    pub public: bool,
    pub allow_device_self_set: bool,
    pub created_at: i64,
}

/// Input for creating a channel
#[derive(Debug, Clone)]
pub struct CreateChannel {
    pub name: String,
    pub version_id: Option<String>,
    pub public: bool,
    pub allow_device_self_set: bool,
}
