use rusqlite::Connection;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS api_keys (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    key_hash TEXT NOT NULL UNIQUE,
    mode TEXT NOT NULL,
    limited_to_apps TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS apps (
    app_id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS app_versions (
    id TEXT PRIMARY KEY,
    app_id TEXT NOT NULL REFERENCES apps(app_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (app_id, name)
);

CREATE TABLE IF NOT EXISTS channels (
    id TEXT PRIMARY KEY,
    app_id TEXT NOT NULL REFERENCES apps(app_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    version_id TEXT REFERENCES app_versions(id) ON DELETE SET NULL,
    public INTEGER NOT NULL DEFAULT 0,
    allow_device_self_set INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    UNIQUE (app_id, name)
);

CREATE TABLE IF NOT EXISTS devices (
    app_id TEXT NOT NULL REFERENCES apps(app_id) ON DELETE CASCADE,
    device_id TEXT NOT NULL,
    version_name TEXT,
    platform TEXT,
    plugin_version TEXT,
    os_version TEXT,
    custom_id TEXT,
    is_prod INTEGER NOT NULL DEFAULT 1,
    is_emulator INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (app_id, device_id)
);

CREATE INDEX IF NOT EXISTS idx_devices_app_updated ON devices(app_id, updated_at DESC);

-- One override per device: pins the device to a channel
CREATE TABLE IF NOT EXISTS channel_devices (
    app_id TEXT NOT NULL REFERENCES apps(app_id) ON DELETE CASCADE,
    device_id TEXT NOT NULL,
    channel_id TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (app_id, device_id)
);

CREATE TABLE IF NOT EXISTS daily_mau (
    app_id TEXT NOT NULL,
    date TEXT NOT NULL,
    mau INTEGER NOT NULL,
    PRIMARY KEY (app_id, date)
);

CREATE TABLE IF NOT EXISTS daily_version (
    app_id TEXT NOT NULL,
    date TEXT NOT NULL,
    version_name TEXT NOT NULL,
    get INTEGER NOT NULL DEFAULT 0,
    install INTEGER NOT NULL DEFAULT 0,
    uninstall INTEGER NOT NULL DEFAULT 0,
    fail INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (app_id, date, version_name)
);
"#;

pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
