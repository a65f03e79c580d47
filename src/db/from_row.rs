//! Row mapping for query results.
//!
//! Each `*_COLS` constant lists columns in the order its `FromRow` impl reads
//! them, so `SELECT {COLS} FROM ...` and the mapper cannot drift apart.

use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, Row, ToSql, types::Type};

use crate::error::Result;
use crate::models::*;

pub const USER_COLS: &str = "id, email, created_at";

pub const API_KEY_COLS: &str = "id, user_id, name, key_hash, mode, limited_to_apps, created_at";

pub const APP_COLS: &str = "app_id, owner_id, name, created_at";

pub const APP_VERSION_COLS: &str = "id, app_id, name, created_at";

pub const CHANNEL_COLS: &str =
    "id, app_id, name, version_id, public, allow_device_self_set, created_at";

/// Device columns qualified with the `d` alias, followed by the override's channel name.
/// Use with `FROM devices d LEFT JOIN channel_devices cd ... LEFT JOIN channels c ...`.
pub const DEVICE_WITH_CHANNEL_COLS: &str = "d.app_id, d.device_id, d.version_name, d.platform, \
     d.plugin_version, d.os_version, d.custom_id, d.is_prod, d.is_emulator, d.created_at, \
     d.updated_at, c.name";

pub const DAILY_MAU_COLS: &str = "app_id, date, mau";

pub const DAILY_VERSION_COLS: &str =
    "app_id, date, version_name, get, install, uninstall, fail";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    Ok(stmt.query_row(params, T::from_row).optional()?)
}

pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

fn parse_text<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl FromRow for ApiKey {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mode: String = row.get(4)?;
        let limited: Option<String> = row.get(5)?;
        let limited_to_apps = limited
            .map(|json| {
                serde_json::from_str::<Vec<String>>(&json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                })
            })
            .transpose()?;

        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            key_hash: row.get(3)?,
            mode: parse_text(4, &mode)?,
            limited_to_apps,
            created_at: row.get(6)?,
        })
    }
}

impl FromRow for App {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            app_id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for AppVersion {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            app_id: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for Channel {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            app_id: row.get(1)?,
            name: row.get(2)?,
            version_id: row.get(3)?,
            public: row.get::<_, i32>(4)? != 0,
            allow_device_self_set: row.get::<_, i32>(5)? != 0,
            created_at: row.get(6)?,
        })
    }
}

impl FromRow for Device {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let platform: Option<String> = row.get(3)?;
        Ok(Self {
            app_id: row.get(0)?,
            device_id: row.get(1)?,
            version_name: row.get(2)?,
            platform: platform.map(|p| parse_text(3, &p)).transpose()?,
            plugin_version: row.get(4)?,
            os_version: row.get(5)?,
            custom_id: row.get(6)?,
            is_prod: row.get::<_, i32>(7)? != 0,
            is_emulator: row.get::<_, i32>(8)? != 0,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl FromRow for DeviceWithChannel {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            device: Device::from_row(row)?,
            channel: row.get(11)?,
        })
    }
}

impl FromRow for DailyMau {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            app_id: row.get(0)?,
            date: row.get(1)?,
            mau: row.get(2)?,
        })
    }
}

impl FromRow for DailyVersion {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            app_id: row.get(0)?,
            date: row.get(1)?,
            version_name: row.get(2)?,
            get: row.get(3)?,
            install: row.get(4)?,
            uninstall: row.get(5)?,
            fail: row.get(6)?,
        })
    }
}
