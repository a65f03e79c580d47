use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// What an API key is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeyMode {
    Read,
    Upload,
    Write,
    All,
}

impl KeyMode {
    /// Linking and unlinking devices mutate channel assignments.
    pub fn can_write(&self) -> bool {
        matches!(self, KeyMode::Write | KeyMode::All)
    }
}

/// API key tied to a user. Only the hash of the key is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub mode: KeyMode,
    /// If set, the key can only reach these app ids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limited_to_apps: Option<Vec<String>>,
    pub created_at: i64,
}

impl ApiKey {
    pub fn allows_app(&self, app_id: &str) -> bool {
        match &self.limited_to_apps {
            Some(apps) => apps.iter().any(|a| a == app_id),
            None => true,
        }
    }
}

/// Input for creating an API key
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    pub user_id: String,
    pub name: String,
    /// Raw key value; hashed before storage
    pub key: String,
    pub mode: KeyMode,
    pub limited_to_apps: Option<Vec<String>>,
}
