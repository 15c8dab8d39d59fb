//! SQLite response store.
//!
//! Entries carry their own expiry timestamp. Reads never return an expired
//! entry; they delete it and report a miss instead.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::CacheError;
use crate::client::CachedResponse;

/// Durable store for cached responses.
#[derive(Clone, Debug)]
pub struct ResponseStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ResponseRow {
    url: String,
    status: i64,
    headers: String,
    body: Vec<u8>,
    created_at: i64,
    expires_at: i64,
}

impl ResponseStore {
    /// Opens (creating if needed) the SQLite file at `path` and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` if the parent directory cannot be created,
    /// `CacheError::Database` if the file cannot be opened and
    /// `CacheError::Migration` if the schema cannot be applied.
    pub async fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        debug!(cache.path = %path.display(), "Response cache opened");

        Ok(Self { pool })
    }

    /// Returns the entry for `key` if it is still fresh at `now`.
    #[instrument(skip(self, now), fields(cache.operation = "GET"))]
    pub async fn get(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CachedResponse>, CacheError> {
        let row = sqlx::query_as::<_, ResponseRow>(
            r#"
            SELECT url, status, headers, body, created_at, expires_at
            FROM responses
            WHERE cache_key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if row.expires_at <= now.timestamp_millis() {
            debug!(cache.key = %key, "Cached response expired");
            self.delete_expired(key, now).await?;
            return Ok(None);
        }

        let status = u16::try_from(row.status)
            .map_err(|_| CacheError::Corrupt(format!("status {} out of range", row.status)))?;

        Ok(Some(CachedResponse {
            url: row.url,
            status,
            headers: serde_json::from_str(&row.headers)?,
            body: row.body,
            created_at: from_millis(row.created_at)?,
            expires_at: Some(from_millis(row.expires_at)?),
            from_cache: true,
        }))
    }

    /// Stores `response` under `key` until `expires_at`, replacing any previous entry.
    #[instrument(skip(self, response), fields(cache.operation = "SET"))]
    pub async fn put(
        &self,
        key: &str,
        method: &str,
        response: &CachedResponse,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let headers = serde_json::to_string(&response.headers)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO responses
                (cache_key, method, url, status, headers, body, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(key)
        .bind(method)
        .bind(&response.url)
        .bind(i64::from(response.status))
        .bind(headers)
        .bind(&response.body)
        .bind(response.created_at.timestamp_millis())
        .bind(expires_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!(cache.key = %key, cache.expires_at = %expires_at, "Cache set");

        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM responses WHERE cache_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes `key` only if its entry has expired at `now`.
    ///
    /// A fresh entry written after the expired one was read stays in place.
    async fn delete_expired(&self, key: &str, now: DateTime<Utc>) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM responses WHERE cache_key = ? AND expires_at <= ?")
            .bind(key)
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes every entry that has expired at `now`, returning how many were removed.
    #[instrument(skip(self), fields(cache.operation = "PURGE"))]
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM responses WHERE expires_at <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?;

        debug!(cache.deleted = %result.rows_affected(), "Expired responses purged");

        Ok(result.rows_affected())
    }

    pub async fn clear(&self) -> Result<u64, CacheError> {
        let result = sqlx::query("DELETE FROM responses")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> Result<u64, CacheError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM responses")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub async fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len().await? == 0)
    }
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, CacheError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CacheError::Corrupt(format!("timestamp {millis} out of range")))
}
