mod from_row;
pub mod queries;
mod schema;
pub mod seed;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub use schema::init_db;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Secret required by the seeding procedures (None = seeding disabled)
    pub service_key: Option<String>,
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Open a pool backed by a SQLite file and make sure the schema exists.
pub fn create_pool(database_path: &str) -> crate::error::Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(configure_connection);
    let pool = Pool::builder().max_size(8).build(manager)?;
    {
        let conn = pool.get()?;
        init_db(&conn)?;
    }
    Ok(pool)
}

/// Single-connection in-memory pool. Every `:memory:` connection is its own
/// database, so the pool must never open a second one.
pub fn create_memory_pool() -> crate::error::Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(configure_connection);
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)?;
    {
        let conn = pool.get()?;
        init_db(&conn)?;
    }
    Ok(pool)
}
