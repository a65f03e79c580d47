//! Fixture procedures: wipe the database and load a known baseline.
//!
//! Both procedures are idempotent. Running `reset_and_seed_data` then
//! `reset_and_seed_stats_data` always produces the same logical state (ids are
//! regenerated, names and relations are not).

use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::error::Result;
use crate::models::{CreateApiKey, CreateChannel, DailyMau, DailyVersion, KeyMode, UpsertDevice};

use super::queries;

/// Well-known fixture values shared by the server tests and the contract checker.
pub mod fixtures {
    pub const DEMO_APP_ID: &str = "com.demo.app";
    pub const OTHER_APP_ID: &str = "com.demo2.app";

    pub const DEMO_USER_EMAIL: &str = "test@devicelink.dev";
    pub const OTHER_USER_EMAIL: &str = "test2@devicelink.dev";

    /// Full-access key for the demo user
    pub const ALL_KEY: &str = "ae6e7458-c46d-4c00-aa3b-153b0b8520ea";
    /// Read-only key for the demo user
    pub const READ_KEY: &str = "67eeaff4-ae4c-49a6-8eb1-0875f5369de1";
    /// Full-access key for the second user (owns `OTHER_APP_ID` only)
    pub const OTHER_USER_KEY: &str = "ab2d3ecb-4fd4-4f05-9c59-2b2bdf4aa6b8";

    pub const VERSIONS: [&str; 4] = ["builtin", "unknown", "1.0.0", "1.0.1"];

    pub const PRODUCTION_CHANNEL: &str = "production";
    pub const NO_ACCESS_CHANNEL: &str = "no_access";

    pub const SEEDED_DEVICE_ID: &str = "00000000-0000-0000-0000-000000000000";
    pub const SEEDED_DEVICE_VERSION: &str = "1.0.0";

    /// Days of history written by the stats seed
    pub const STATS_DAYS: i64 = 30;
}

use fixtures::*;

/// Delete every row (stats included) and recreate users, keys, apps, versions,
/// channels and the seeded device.
pub fn reset_and_seed_data(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "DELETE FROM channel_devices;
         DELETE FROM devices;
         DELETE FROM channels;
         DELETE FROM app_versions;
         DELETE FROM apps;
         DELETE FROM api_keys;
         DELETE FROM users;
         DELETE FROM daily_mau;
         DELETE FROM daily_version;",
    )?;

    let demo_user = queries::create_user(&tx, DEMO_USER_EMAIL)?;
    let other_user = queries::create_user(&tx, OTHER_USER_EMAIL)?;

    for (user_id, name, key, mode) in [
        (&demo_user.id, "all", ALL_KEY, KeyMode::All),
        (&demo_user.id, "read", READ_KEY, KeyMode::Read),
        (&other_user.id, "all", OTHER_USER_KEY, KeyMode::All),
    ] {
        queries::create_api_key(
            &tx,
            &CreateApiKey {
                user_id: user_id.clone(),
                name: name.to_string(),
                key: key.to_string(),
                mode,
                limited_to_apps: None,
            },
        )?;
    }

    for (app_id, owner_id, name) in [
        (DEMO_APP_ID, &demo_user.id, "Demo app"),
        (OTHER_APP_ID, &other_user.id, "Second demo app"),
    ] {
        queries::create_app(&tx, app_id, owner_id, name)?;

        let mut version_ids = Vec::with_capacity(VERSIONS.len());
        for version in VERSIONS {
            version_ids.push((version, queries::create_app_version(&tx, app_id, version)?.id));
        }
        let version_id = |name: &str| {
            version_ids
                .iter()
                .find(|(v, _)| *v == name)
                .map(|(_, id)| id.clone())
        };

        queries::create_channel(
            &tx,
            app_id,
            &CreateChannel {
                name: PRODUCTION_CHANNEL.to_string(),
                version_id: version_id("1.0.0"),
                public: true,
                allow_device_self_set: false,
            },
        )?;
        queries::create_channel(
            &tx,
            app_id,
            &CreateChannel {
                name: NO_ACCESS_CHANNEL.to_string(),
                version_id: version_id("1.0.1"),
                public: false,
                allow_device_self_set: false,
            },
        )?;
    }

    queries::upsert_device(
        &tx,
        DEMO_APP_ID,
        SEEDED_DEVICE_ID,
        &UpsertDevice {
            version_name: Some(SEEDED_DEVICE_VERSION.to_string()),
            platform: Some(crate::models::Platform::Android),
            plugin_version: Some("6.0.0".to_string()),
            os_version: Some("14".to_string()),
            is_prod: Some(true),
            is_emulator: Some(false),
            ..Default::default()
        },
    )?;

    tx.commit()?;
    tracing::info!("Seeded baseline data");
    Ok(())
}

/// Delete and regenerate `STATS_DAYS` days of usage counters for every app.
///
/// Values are derived from the day offset so repeated runs produce identical rows.
pub fn reset_and_seed_stats_data(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute_batch("DELETE FROM daily_mau; DELETE FROM daily_version;")?;

    let today = Utc::now().date_naive();
    let app_ids = queries::list_app_ids(&tx)?;

    for app_id in &app_ids {
        for offset in 0..STATS_DAYS {
            let date = (today - Duration::days(offset)).format("%Y-%m-%d").to_string();

            queries::insert_daily_mau(
                &tx,
                &DailyMau {
                    app_id: app_id.clone(),
                    date: date.clone(),
                    mau: 100 + (offset * 7) % 23,
                },
            )?;

            for (idx, version) in ["1.0.0", "1.0.1"].iter().enumerate() {
                let weight = idx as i64 + 1;
                queries::insert_daily_version(
                    &tx,
                    &DailyVersion {
                        app_id: app_id.clone(),
                        date: date.clone(),
                        version_name: version.to_string(),
                        get: 50 * weight + offset % 5,
                        install: 20 * weight + offset % 3,
                        uninstall: offset % 2,
                        fail: (offset + idx as i64) % 4,
                    },
                )?;
            }
        }
    }

    tx.commit()?;
    tracing::info!(apps = app_ids.len(), days = STATS_DAYS, "Seeded stats data");
    Ok(())
}
