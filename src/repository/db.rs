//! Database Connection and Setup
//!
//! SQLite-backed implementation of `KeyValueStore`: one `kv` table,
//! one row per key.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use super::kv::KeyValueStore;

/// SQLite key/value store
pub struct SqliteKv {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Open (creating if needed) the database at `db_path` and run migrations.
/// `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<SqliteKv> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Storage(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;
    log::debug!("Opened key/value store at {}", db_path.display());

    Ok(SqliteKv::new(conn))
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        (),
    )
    .map_err(|e| DomainError::Storage(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = self.conn.lock().await;

        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| DomainError::Storage(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        // Single statement, so the value is replaced atomically
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| DomainError::Storage(e.to_string()))?;

        Ok(())
    }
}
