//! Durable key/value storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::PersistentStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_DB_FILE: &str = "session-store.db";
const APP_DIR: &str = "authkit";

/// SQLite-backed persistent store implementation
///
/// Provides durable key-value storage using a single SQLite table:
/// - One row per key, upserted on write
/// - Async operations through a connection pool
/// - Last write wins; no cross-call transactions
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a store backed by the database file at `db_path`
    pub async fn open(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| BridgeError::Database(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;

        debug!(path = ?db_path, "Initialized persistent store");

        Ok(Self { pool })
    }

    /// Create an in-memory store (for testing)
    ///
    /// The pool is pinned to a single connection because every SQLite
    /// connection to `:memory:` sees its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::Database(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;

        Ok(Self { pool })
    }

    /// Default database location inside the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir().ok_or_else(|| {
            BridgeError::NotAvailable("No local data directory on this platform".to_string())
        })?;

        Ok(data_dir.join(APP_DIR).join(DEFAULT_DB_FILE))
    }

    async fn create_table(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| BridgeError::Database(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    /// Get the current Unix timestamp
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default()
    }
}

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Database(format!("Failed to get item: {}", e)))?;

        match row {
            Some(row) => {
                let value: String = row.get(0);
                debug!(key = key, "Retrieved item");
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::Database(format!("Failed to set item: {}", e)))?;

        debug!(key = key, "Stored item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Database(format!("Failed to remove item: {}", e)))?;

        debug!(key = key, "Removed item");
        Ok(())
    }

    async fn has_item(&self, key: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Database(format!("Failed to check key: {}", e)))?;

        Ok(row.is_some())
    }
}
