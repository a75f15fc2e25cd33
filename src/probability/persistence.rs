//! SQLite-backed audit log of computations

use chrono::Local;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::models::{AuditEntry, ComputationRecord, ProbabilityInput};

/// Local-time format of the `created_at` column
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to serialize audit entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only audit log of computations.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    pool: SqlitePool,
    chapter: Arc<str>,
}

impl AuditRecorder {
    /// Open (creating if absent) the audit database at `database_path`
    pub async fn open(
        database_path: impl AsRef<Path>,
        chapter: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let database_path = database_path.as_ref();

        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let recorder = Self {
            pool,
            chapter: Arc::from(chapter.into()),
        };
        recorder.initialize_schema().await?;

        info!("Audit log opened at {}", database_path.display());
        Ok(recorder)
    }

    async fn initialize_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chapter TEXT,
                operation TEXT,
                input TEXT,
                result TEXT,
                created_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Audit schema initialized");
        Ok(())
    }

    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// Snapshot a computation into an entry stamped with the current local time
    pub fn entry(
        &self,
        input: &ProbabilityInput,
        result: f64,
    ) -> Result<AuditEntry, StorageError> {
        Ok(AuditEntry {
            chapter: self.chapter.to_string(),
            operation: input.operation().label().to_string(),
            input: serde_json::to_string(input)?,
            result: serde_json::to_string(&result)?,
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }

    /// Record a computation without blocking the caller.
    ///
    /// The insert runs on its own task. Failures are logged and otherwise
    /// dropped: the caller has already been given its result. The handle may
    /// be awaited, but request handlers simply detach it.
    pub fn record(&self, input: ProbabilityInput, result: f64) -> JoinHandle<()> {
        let operation = input.operation();
        let prepared = self.entry(&input, result);
        let recorder = self.clone();

        tokio::spawn(async move {
            let outcome = match prepared {
                Ok(entry) => recorder.append(&entry).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(id) => debug!("Recorded {} computation as #{}", operation, id),
                Err(e) => warn!("Failed to record {} computation: {}", operation, e),
            }
        })
    }

    /// Insert an entry and return the id assigned by the store
    pub async fn append(&self, entry: &AuditEntry) -> Result<i64, StorageError> {
        let outcome = sqlx::query(
            r#"
            INSERT INTO history (chapter, operation, input, result, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.chapter)
        .bind(&entry.operation)
        .bind(&entry.input)
        .bind(&entry.result)
        .bind(&entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(outcome.last_insert_rowid())
    }

    /// Up to `limit` records, most recent first
    pub async fn recent(&self, limit: u32) -> Result<Vec<ComputationRecord>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, chapter, operation, input, result, created_at
            FROM history
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool. Subsequent queries fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// Columns are nullable so that logs written by older deployments still load.
fn record_from_row(row: &SqliteRow) -> Result<ComputationRecord, StorageError> {
    let text = |column: &str| -> Result<String, sqlx::Error> {
        Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
    };

    Ok(ComputationRecord {
        id: row.try_get("id")?,
        chapter: text("chapter")?,
        operation: text("operation")?,
        input: text("input")?,
        result: text("result")?,
        created_at: text("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::models::{ConditionalInput, IntersectionInput, UnionInput};
    use tempfile::tempdir;

    fn union_input() -> ProbabilityInput {
        ProbabilityInput::from(UnionInput {
            p_a: 0.5,
            p_b: 0.4,
            p_a_and_b: 0.2,
        })
    }

    #[tokio::test]
    async fn test_open_creates_empty_log() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("history.db");

        let recorder = AuditRecorder::open(&db_path, "Chapter 1").await.unwrap();

        assert!(db_path.exists());
        assert_eq!(recorder.count().await.unwrap(), 0);
        assert!(recorder.recent(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reopen_keeps_records() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("history.db");

        let recorder = AuditRecorder::open(&db_path, "Chapter 1").await.unwrap();
        let entry = recorder.entry(&union_input(), 0.7).unwrap();
        recorder.append(&entry).await.unwrap();
        recorder.close().await;

        let reopened = AuditRecorder::open(&db_path, "Chapter 1").await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_entry_snapshots_input_and_result() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();

        let entry = recorder.entry(&union_input(), 0.7).unwrap();

        assert_eq!(entry.chapter, "Chapter 1");
        assert_eq!(entry.operation, "Union");
        assert_eq!(entry.input, r#"{"pA":0.5,"pB":0.4,"pAnB":0.2}"#);
        assert_eq!(entry.result, "0.7");
        assert!(chrono::NaiveDateTime::parse_from_str(&entry.created_at, TIMESTAMP_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn test_ids_increase_and_recent_is_newest_first() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();

        let first = recorder
            .append(&recorder.entry(&union_input(), 0.7).unwrap())
            .await
            .unwrap();
        let second_input = ProbabilityInput::from(IntersectionInput { p_a: 0.3, p_b: 0.5 });
        let second = recorder
            .append(&recorder.entry(&second_input, 0.15).unwrap())
            .await
            .unwrap();
        assert!(second > first);

        let records = recorder.recent(20).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second);
        assert_eq!(records[0].operation, "Intersection independent");
        assert_eq!(records[1].id, first);
        assert_eq!(records[1].result_value(), Some(0.7));
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();

        for i in 0..25 {
            let input = ProbabilityInput::from(ConditionalInput {
                p_a_and_b: 0.1,
                p_b: 0.5,
            });
            let entry = recorder.entry(&input, f64::from(i)).unwrap();
            recorder.append(&entry).await.unwrap();
        }

        let records = recorder.recent(20).await.unwrap();
        assert_eq!(records.len(), 20);
        assert_eq!(records[0].result_value(), Some(24.0));
        assert_eq!(records[19].result_value(), Some(5.0));
    }

    #[tokio::test]
    async fn test_record_runs_in_background() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();

        recorder.record(union_input(), 0.7).await.unwrap();

        let records = recorder.recent(1).await.unwrap();
        assert_eq!(records[0].operation, "Union");
        assert_eq!(records[0].chapter, "Chapter 1");
    }

    #[tokio::test]
    async fn test_record_failure_is_swallowed() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();
        recorder.close().await;

        // The task completes normally even though the insert fails
        recorder.record(union_input(), 0.7).await.unwrap();
    }

    #[tokio::test]
    async fn test_recent_fails_when_store_is_closed() {
        let temp_dir = tempdir().unwrap();
        let recorder = AuditRecorder::open(temp_dir.path().join("history.db"), "Chapter 1")
            .await
            .unwrap();
        recorder.close().await;

        let err = recorder.recent(20).await.unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
