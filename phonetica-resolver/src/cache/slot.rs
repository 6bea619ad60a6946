//! Durable key-value slots for cache persistence

use async_trait::async_trait;
use phonetica_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Durable string storage keyed by name
///
/// Implementations may fail; callers treat every failure as non-fatal.
#[async_trait]
pub trait DurableSlot: Send + Sync {
    /// Stored value, `None` if never written
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the stored value
    async fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Slot backed by the SQLite `settings` table
#[derive(Clone)]
pub struct SqliteSlot {
    pool: SqlitePool,
}

impl SqliteSlot {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DurableSlot for SqliteSlot {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        phonetica_common::db::get_setting(&self.pool, key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        phonetica_common::db::set_setting(&self.pool, key, value).await
    }
}

/// Process-local slot; contents vanish on exit
#[derive(Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableSlot for MemorySlot {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
