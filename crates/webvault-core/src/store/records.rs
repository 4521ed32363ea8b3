//! Record writes (persist) and read-back.

use sqlx::Row;
use std::path::Path;

use super::db::ContentStore;
use crate::error::StoreError;
use crate::job::ContentRecord;

impl ContentStore {
    /// Read the file at `filename` and append a `(filename, url, content)` row.
    pub async fn persist(&self, filename: &str, url: &str) -> Result<(), StoreError> {
        self.persist_from(filename, url, Path::new(filename)).await
    }

    /// Like [`ContentStore::persist`] but reads the content from `source`.
    ///
    /// The write lock is held from schema check through insert and released on
    /// every return path. Valid UTF-8 content is bound as TEXT; anything else is
    /// bound as raw bytes so nothing is re-encoded.
    pub async fn persist_from(
        &self,
        filename: &str,
        url: &str,
        source: &Path,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        self.create_table().await?;

        let content = tokio::fs::read(source)
            .await
            .map_err(|e| StoreError::File {
                path: source.to_path_buf(),
                source: e,
            })?;
        let len = content.len();

        let query = sqlx::query("INSERT INTO Content (filename, url, content) VALUES (?1, ?2, ?3)")
            .bind(filename)
            .bind(url);
        let query = match String::from_utf8(content) {
            Ok(text) => query.bind(text),
            Err(e) => query.bind(e.into_bytes()),
        };
        query.execute(&self.pool).await?;

        tracing::debug!(filename, url, bytes = len, "record inserted");
        Ok(())
    }

    /// All records in insertion order.
    ///
    /// Reads skip the write lock; this relies on the pool holding a single
    /// connection, so a read can never observe a half-applied write.
    pub async fn list_records(&self) -> Result<Vec<ContentRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT filename, url, content
            FROM Content
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let filename: Option<String> = row.try_get("filename")?;
            let url: Option<String> = row.try_get("url")?;
            let content: Option<Vec<u8>> = row.try_get("content")?;
            out.push(ContentRecord {
                filename: filename.unwrap_or_default(),
                url: url.unwrap_or_default(),
                content: content.unwrap_or_default(),
            });
        }
        Ok(out)
    }

    /// Number of rows in the `Content` table.
    ///
    /// Lock-free like [`ContentStore::list_records`]; same single-connection assumption.
    pub async fn count_records(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM Content")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}
