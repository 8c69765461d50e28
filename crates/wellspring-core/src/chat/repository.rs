//! HistoryStore trait definition.
//!
//! The persistence boundary for chat transcripts and session summaries.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition);
//! implementations live in wellspring-infra (e.g., `SqliteHistoryStore`).

use uuid::Uuid;
use wellspring_types::chat::{ChatMessage, MessageRecord, SessionSummary};
use wellspring_types::error::RepositoryError;

/// Store trait for chat history persistence.
pub trait HistoryStore: Send + Sync {
    /// Fetch at most `limit` messages for a session: the most recent
    /// `limit`, returned oldest-first. Unknown sessions yield an empty
    /// vec, never an error.
    fn fetch_history(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Persist a batch of messages atomically. No-op on an empty batch.
    ///
    /// Either every record in the batch becomes durable or none do; a
    /// partial write must surface as an error, never as success.
    fn store_messages(
        &self,
        records: &[MessageRecord],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Idempotent upsert of a session's aggregate summary, keyed by
    /// `session_id`. Latest values win.
    fn upsert_session_summary(
        &self,
        summary: &SessionSummary,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Minimal read to confirm store connectivity.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
