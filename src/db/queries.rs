use chrono::Utc;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

use super::from_row::{
    API_KEY_COLS, APP_COLS, APP_VERSION_COLS, CHANNEL_COLS, DAILY_MAU_COLS, DAILY_VERSION_COLS,
    DEVICE_WITH_CHANNEL_COLS, USER_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Hash an API key for storage/lookup (raw keys are never stored).
pub fn hash_api_key(key: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(b"devicelink-apikey-v1:");
    hasher.update(key.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Devices joined with their channel override, ready for a WHERE clause.
fn device_select() -> String {
    format!(
        "SELECT {} FROM devices d
         LEFT JOIN channel_devices cd ON cd.app_id = d.app_id AND cd.device_id = d.device_id
         LEFT JOIN channels c ON c.id = cd.channel_id",
        DEVICE_WITH_CHANNEL_COLS
    )
}

// ============ Users ============

pub fn create_user(conn: &Connection, email: &str) -> Result<User> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
        params![&id, email, now],
    )?;

    Ok(User {
        id,
        email: email.to_string(),
        created_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

// ============ API Keys ============

pub fn create_api_key(conn: &Connection, input: &CreateApiKey) -> Result<ApiKey> {
    let id = gen_id();
    let now = now();
    let key_hash = hash_api_key(&input.key);
    let limited = input
        .limited_to_apps
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO api_keys (id, user_id, name, key_hash, mode, limited_to_apps, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &id,
            &input.user_id,
            &input.name,
            &key_hash,
            input.mode.as_ref(),
            limited,
            now
        ],
    )?;

    Ok(ApiKey {
        id,
        user_id: input.user_id.clone(),
        name: input.name.clone(),
        key_hash,
        mode: input.mode,
        limited_to_apps: input.limited_to_apps.clone(),
        created_at: now,
    })
}

pub fn get_api_key_by_key(conn: &Connection, key: &str) -> Result<Option<ApiKey>> {
    let key_hash = hash_api_key(key);
    query_one(
        conn,
        &format!("SELECT {} FROM api_keys WHERE key_hash = ?1", API_KEY_COLS),
        &[&key_hash],
    )
}

/// Resolve a raw API key to its owner. Returns None for unknown keys.
pub fn get_user_by_api_key(conn: &Connection, key: &str) -> Result<Option<(User, ApiKey)>> {
    let Some(api_key) = get_api_key_by_key(conn, key)? else {
        return Ok(None);
    };
    Ok(get_user_by_id(conn, &api_key.user_id)?.map(|user| (user, api_key)))
}

// ============ Apps ============

pub fn create_app(conn: &Connection, app_id: &str, owner_id: &str, name: &str) -> Result<App> {
    let now = now();

    conn.execute(
        "INSERT INTO apps (app_id, owner_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![app_id, owner_id, name, now],
    )?;

    Ok(App {
        app_id: app_id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        created_at: now,
    })
}

pub fn get_app(conn: &Connection, app_id: &str) -> Result<Option<App>> {
    query_one(
        conn,
        &format!("SELECT {} FROM apps WHERE app_id = ?1", APP_COLS),
        &[&app_id],
    )
}

pub fn list_app_ids(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT app_id FROM apps ORDER BY app_id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(ids)
}

pub fn create_app_version(conn: &Connection, app_id: &str, name: &str) -> Result<AppVersion> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO app_versions (id, app_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, app_id, name, now],
    )?;

    Ok(AppVersion {
        id,
        app_id: app_id.to_string(),
        name: name.to_string(),
        created_at: now,
    })
}

pub fn get_app_version_by_name(
    conn: &Connection,
    app_id: &str,
    name: &str,
) -> Result<Option<AppVersion>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM app_versions WHERE app_id = ?1 AND name = ?2",
            APP_VERSION_COLS
        ),
        &[&app_id, &name],
    )
}

// ============ Channels ============

pub fn create_channel(conn: &Connection, app_id: &str, input: &CreateChannel) -> Result<Channel> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO channels (id, app_id, name, version_id, public, allow_device_self_set, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &id,
            app_id,
            &input.name,
            &input.version_id,
            input.public as i32,
            input.allow_device_self_set as i32,
            now
        ],
    )?;

    Ok(Channel {
        id,
        app_id: app_id.to_string(),
        name: input.name.clone(),
        version_id: input.version_id.clone(),
        public: input.public,
        allow_device_self_set: input.allow_device_self_set,
        created_at: now,
    })
}

pub fn get_channel_by_name(conn: &Connection, app_id: &str, name: &str) -> Result<Option<Channel>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM channels WHERE app_id = ?1 AND name = ?2",
            CHANNEL_COLS
        ),
        &[&app_id, &name],
    )
}

// ============ Devices ============

/// Insert or update a device row. Fields left as None keep their stored value.
pub fn upsert_device(
    conn: &Connection,
    app_id: &str,
    device_id: &str,
    input: &UpsertDevice,
) -> Result<()> {
    let now = now();
    conn.execute(
        "INSERT INTO devices (app_id, device_id, version_name, platform, plugin_version, os_version,
                              custom_id, is_prod, is_emulator, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 1), COALESCE(?9, 0), ?10, ?10)
         ON CONFLICT (app_id, device_id) DO UPDATE SET
             version_name = COALESCE(excluded.version_name, devices.version_name),
             platform = COALESCE(excluded.platform, devices.platform),
             plugin_version = COALESCE(excluded.plugin_version, devices.plugin_version),
             os_version = COALESCE(excluded.os_version, devices.os_version),
             custom_id = COALESCE(excluded.custom_id, devices.custom_id),
             is_prod = COALESCE(?8, devices.is_prod),
             is_emulator = COALESCE(?9, devices.is_emulator),
             updated_at = excluded.updated_at",
        params![
            app_id,
            device_id,
            &input.version_name,
            input.platform.map(|p| p.as_ref().to_string()),
            &input.plugin_version,
            &input.os_version,
            &input.custom_id,
            input.is_prod.map(i32::from),
            input.is_emulator.map(i32::from),
            now
        ],
    )?;
    Ok(())
}

/// Pin a device to a channel, replacing any previous override.
pub fn set_channel_override(
    conn: &Connection,
    app_id: &str,
    device_id: &str,
    channel_id: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO channel_devices (app_id, device_id, channel_id, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (app_id, device_id) DO UPDATE SET
             channel_id = excluded.channel_id,
             created_at = excluded.created_at",
        params![app_id, device_id, channel_id, now()],
    )?;
    Ok(())
}

/// Record the device and pin it to `channel` in one write transaction.
///
/// IMMEDIATE takes the write lock up front so the device row and its override
/// are never observed half-written.
pub fn link_device(
    conn: &mut Connection,
    app_id: &str,
    device_id: &str,
    input: &UpsertDevice,
    channel: &Channel,
) -> Result<DeviceWithChannel> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    upsert_device(&tx, app_id, device_id, input)?;
    set_channel_override(&tx, app_id, device_id, &channel.id)?;

    let device = get_device(&tx, app_id, device_id)?.ok_or_else(|| {
        crate::error::AppError::Internal(format!("device {} vanished during link", device_id))
    })?;

    tx.commit()?;
    Ok(device)
}

pub fn get_device(
    conn: &Connection,
    app_id: &str,
    device_id: &str,
) -> Result<Option<DeviceWithChannel>> {
    query_one(
        conn,
        &format!("{} WHERE d.app_id = ?1 AND d.device_id = ?2", device_select()),
        &[&app_id, &device_id],
    )
}

pub fn list_devices_for_app(
    conn: &Connection,
    app_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<DeviceWithChannel>> {
    query_all(
        conn,
        &format!(
            "{} WHERE d.app_id = ?1 ORDER BY d.updated_at DESC, d.device_id LIMIT ?2 OFFSET ?3",
            device_select()
        ),
        params![app_id, limit, offset],
    )
}

pub fn count_devices_for_app(conn: &Connection, app_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM devices WHERE app_id = ?1",
        params![app_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Remove a device's channel override. Returns whether an override existed.
pub fn unlink_device(conn: &Connection, app_id: &str, device_id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM channel_devices WHERE app_id = ?1 AND device_id = ?2",
        params![app_id, device_id],
    )?;
    Ok(deleted > 0)
}

// ============ Stats ============

pub fn insert_daily_mau(conn: &Connection, stat: &DailyMau) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO daily_mau (app_id, date, mau) VALUES (?1, ?2, ?3)",
        params![&stat.app_id, &stat.date, stat.mau],
    )?;
    Ok(())
}

pub fn insert_daily_version(conn: &Connection, stat: &DailyVersion) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO daily_version (app_id, date, version_name, get, install, uninstall, fail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &stat.app_id,
            &stat.date,
            &stat.version_name,
            stat.get,
            stat.install,
            stat.uninstall,
            stat.fail
        ],
    )?;
    Ok(())
}

pub fn list_daily_mau(conn: &Connection, app_id: &str) -> Result<Vec<DailyMau>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM daily_mau WHERE app_id = ?1 ORDER BY date DESC",
            DAILY_MAU_COLS
        ),
        &[&app_id],
    )
}

pub fn list_daily_version(conn: &Connection, app_id: &str) -> Result<Vec<DailyVersion>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM daily_version WHERE app_id = ?1 ORDER BY date DESC, version_name",
            DAILY_VERSION_COLS
        ),
        &[&app_id],
    )
}
