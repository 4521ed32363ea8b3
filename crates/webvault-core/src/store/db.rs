//! Connection, schema and the write lock.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Idempotent schema statement; the table has no key and no indices.
const CREATE_CONTENT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS Content (
        filename TEXT,
        url TEXT,
        content TEXT
    );
"#;

/// Handle to the SQLite content store.
///
/// Cheap to clone; clones share the same connection and the same write lock.
/// The pool holds a single connection, and every statement runs while the lock
/// is held.
#[derive(Clone)]
pub struct ContentStore {
    pub(crate) pool: Pool<Sqlite>,
    pub(crate) write_lock: Arc<Mutex<()>>,
}

impl ContentStore {
    fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open (or create) the store at a specific path. Creates parent dirs if needed.
    /// Does not create the schema; call [`ContentStore::ensure_schema`].
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::File {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        tracing::debug!("opened content store at {}", path.display());
        Ok(Self::from_pool(pool))
    }

    /// Create the `Content` table if absent. Safe to call any number of times.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.create_table().await
    }

    /// Schema statement without taking the lock; callers must hold it.
    pub(crate) async fn create_table(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_CONTENT_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Close the underlying connection. Clones become unusable.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
/// Open an in-memory store for tests (no disk I/O, no schema yet).
pub(crate) async fn open_memory() -> Result<ContentStore, StoreError> {
    // Single connection so the pool never hands back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    Ok(ContentStore::from_pool(pool))
}
