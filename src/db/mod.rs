pub mod migrations;
pub mod storage;
pub mod store;

pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::{BookingStore, DEFAULT_STORAGE_KEY};

use anyhow::Context;
use rusqlite::Connection;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}
