//! SQLite history store implementation.
//!
//! Implements `HistoryStore` from `wellspring-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader pool for
//! fetches and the single writer for mutations. Table names come from
//! configuration (the bundled migrations create the defaults).

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use wellspring_core::chat::repository::HistoryStore;
use wellspring_types::chat::{ChatMessage, MessageRecord, MessageRole, SessionSummary};
use wellspring_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryStore`.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: DatabasePool,
    chat_table: String,
    summary_table: String,
}

impl SqliteHistoryStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool, chat_table: String, summary_table: String) -> Self {
        Self {
            pool,
            chat_table,
            summary_table,
        }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct ChatMessageRow {
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            role,
            content: self.content,
            created_at: Some(created_at),
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl HistoryStore for SqliteHistoryStore {
    async fn fetch_history(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Window to the most recent `limit` rows, then flip back to
        // oldest-first for the caller.
        let sql = format!(
            r#"SELECT role, content, created_at FROM (
                   SELECT id, role, content, created_at FROM {table}
                   WHERE session_id = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               ) ORDER BY created_at ASC, id ASC"#,
            table = self.chat_table
        );

        let rows = sqlx::query(&sql)
            .bind(session_id.to_string())
            .bind(limit as i64)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row = ChatMessageRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn store_messages(&self, records: &[MessageRecord]) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "INSERT INTO {table} (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
            table = self.chat_table
        );

        // One transaction for the whole batch: either every record lands
        // or none do.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for record in records {
            sqlx::query(&sql)
                .bind(Uuid::now_v7().to_string())
                .bind(record.session_id.to_string())
                .bind(record.role.to_string())
                .bind(&record.content)
                .bind(format_datetime(&record.created_at))
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn upsert_session_summary(
        &self,
        summary: &SessionSummary,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            r#"INSERT INTO {table}
                   (session_id, message_count, last_user_message, last_assistant_message, metadata, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(session_id) DO UPDATE SET
                   message_count = excluded.message_count,
                   last_user_message = excluded.last_user_message,
                   last_assistant_message = excluded.last_assistant_message,
                   metadata = excluded.metadata,
                   updated_at = excluded.updated_at"#,
            table = self.summary_table
        );

        let metadata = serde_json::to_string(&summary.metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata: {e}")))?;

        sqlx::query(&sql)
            .bind(summary.session_id.to_string())
            .bind(summary.message_count as i64)
            .bind(&summary.last_user_message)
            .bind(&summary.last_assistant_message)
            .bind(metadata)
            .bind(format_datetime(&summary.updated_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let sql = format!("SELECT 1 FROM {table} LIMIT 1", table = self.chat_table);

        sqlx::query(&sql)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
