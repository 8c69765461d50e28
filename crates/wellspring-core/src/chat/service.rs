//! Chat orchestration service.
//!
//! Sequences one request through its state machine: validate, resolve
//! session, fetch history, generate reply, persist the exchange, and
//! best-effort summary upsert. Stateless across requests; all durable
//! state lives behind the [`HistoryStore`].

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use wellspring_types::chat::{
    ChatHistoryResponse, ChatMessage, ChatRequest, ChatResponse, MessageRecord, MessageRole,
    SessionSummary,
};
use wellspring_types::error::ChatError;

use crate::chat::repository::HistoryStore;
use crate::completion::{CompletionProvider, CompletionService};

/// Orchestrates the chat flow across the store and the completion
/// provider.
///
/// Generic over [`HistoryStore`] and [`CompletionProvider`] so the core
/// never depends on wellspring-infra.
pub struct ChatService<S: HistoryStore, P: CompletionProvider> {
    store: S,
    completion: CompletionService<P>,
    history_limit: u32,
}

impl<S: HistoryStore, P: CompletionProvider> ChatService<S, P> {
    pub fn new(store: S, completion: CompletionService<P>, history_limit: u32) -> Self {
        Self {
            store,
            completion,
            history_limit,
        }
    }

    /// Handle one chat request end to end.
    ///
    /// Critical-path failures (history read, completion, message batch
    /// write) abort the request. The summary upsert is best-effort: its
    /// failure is logged and the response is returned regardless.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let prompt = request.message.trim();
        if prompt.is_empty() {
            return Err(ChatError::Validation(
                "message must not be empty".to_string(),
            ));
        }
        let prompt = prompt.to_string();

        let session_id = request.session_id.unwrap_or_else(Uuid::now_v7);

        let history = self
            .store
            .fetch_history(&session_id, self.history_limit)
            .await?;
        info!(session_id = %session_id, history_len = history.len(), "history fetched");

        let reply = self
            .completion
            .generate_reply(&history, &prompt, request.language.as_deref())
            .await?;
        info!(session_id = %session_id, reply_len = reply.len(), "reply generated");

        // Both turns of the exchange share one timestamp; insertion order
        // (time-sorted ids) keeps the user turn ahead of the assistant turn.
        let now = Utc::now();
        let records = [
            MessageRecord {
                session_id,
                role: MessageRole::User,
                content: prompt.clone(),
                created_at: now,
            },
            MessageRecord {
                session_id,
                role: MessageRole::Assistant,
                content: reply.clone(),
                created_at: now,
            },
        ];
        self.store.store_messages(&records).await?;
        info!(session_id = %session_id, "exchange persisted");

        let summary = SessionSummary {
            session_id,
            message_count: history.len() as u32 + 2,
            last_user_message: prompt.clone(),
            last_assistant_message: reply.clone(),
            updated_at: now,
            metadata: json!({ "language": request.language }),
        };
        if let Err(err) = self.store.upsert_session_summary(&summary).await {
            warn!(session_id = %session_id, error = %err, "session summary upsert failed");
        }

        let mut messages = history;
        messages.push(ChatMessage {
            role: MessageRole::User,
            content: prompt,
            created_at: Some(now),
        });
        messages.push(ChatMessage {
            role: MessageRole::Assistant,
            content: reply.clone(),
            created_at: Some(now),
        });

        Ok(ChatResponse {
            session_id,
            reply,
            messages,
        })
    }

    /// Read-only transcript replay for a session, using the same fetch
    /// contract and limit as the chat flow.
    pub async fn get_history(&self, session_id: Uuid) -> Result<ChatHistoryResponse, ChatError> {
        let messages = self
            .store
            .fetch_history(&session_id, self.history_limit)
            .await?;
        Ok(ChatHistoryResponse {
            session_id,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use wellspring_types::chat::PromptMessage;
    use wellspring_types::error::{CompletionError, RepositoryError};

    /// In-memory store that records calls and optionally fails specific
    /// operations.
    #[derive(Clone, Default)]
    struct MockStore {
        history: Arc<Mutex<Vec<ChatMessage>>>,
        stored: Arc<Mutex<Vec<MessageRecord>>>,
        summaries: Arc<Mutex<Vec<SessionSummary>>>,
        fetch_calls: Arc<AtomicUsize>,
        store_calls: Arc<AtomicUsize>,
        fail_store: Arc<Mutex<bool>>,
        fail_summary: Arc<Mutex<bool>>,
    }

    impl HistoryStore for MockStore {
        async fn fetch_history(
            &self,
            _session_id: &Uuid,
            limit: u32,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let history = self.history.lock().unwrap();
            Ok(history.iter().take(limit as usize).cloned().collect())
        }

        async fn store_messages(
            &self,
            records: &[MessageRecord],
        ) -> Result<(), RepositoryError> {
            self.store_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail_store.lock().unwrap() {
                return Err(RepositoryError::Connection);
            }
            self.stored.lock().unwrap().extend_from_slice(records);
            Ok(())
        }

        async fn upsert_session_summary(
            &self,
            summary: &SessionSummary,
        ) -> Result<(), RepositoryError> {
            if *self.fail_summary.lock().unwrap() {
                return Err(RepositoryError::Query("summary table missing".to_string()));
            }
            self.summaries.lock().unwrap().push(summary.clone());
            Ok(())
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[derive(Clone)]
    struct MockProvider {
        reply: Result<String, ()>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl CompletionProvider for MockProvider {
        async fn complete(&self, _messages: &[PromptMessage]) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .map_err(|_| CompletionError::EmptyResponse)
        }
    }

    fn service(
        store: MockStore,
        provider: MockProvider,
    ) -> ChatService<MockStore, MockProvider> {
        let completion = CompletionService::new(
            provider,
            HashMap::from([("en".to_string(), "preamble".to_string())]),
            "en".to_string(),
        );
        ChatService::new(store, completion, 20)
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            session_id: None,
            language: None,
        }
    }

    #[tokio::test]
    async fn test_transcript_order_history_then_new_turns() {
        let store = MockStore::default();
        store.history.lock().unwrap().extend([
            ChatMessage {
                role: MessageRole::User,
                content: "first".to_string(),
                created_at: None,
            },
            ChatMessage {
                role: MessageRole::Assistant,
                content: "second".to_string(),
                created_at: None,
            },
        ]);
        let svc = service(store, MockProvider::replying("the reply"));

        let response = svc.handle_chat(request("third")).await.unwrap();

        let contents: Vec<&str> = response
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second", "third", "the reply"]);
        assert_eq!(response.messages[2].role, MessageRole::User);
        assert_eq!(response.messages[3].role, MessageRole::Assistant);
        assert_eq!(response.reply, "the reply");
    }

    #[tokio::test]
    async fn test_whitespace_message_rejected_before_any_io() {
        let store = MockStore::default();
        let provider = MockProvider::replying("unused");
        let svc = service(store.clone(), provider.clone());

        let err = svc.handle_chat(request("   ")).await.unwrap_err();

        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.store_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_skips_persistence() {
        let store = MockStore::default();
        let svc = service(store.clone(), MockProvider::failing());

        let err = svc.handle_chat(request("hello")).await.unwrap_err();

        assert!(matches!(err, ChatError::Upstream(_)));
        assert_eq!(store.store_calls.load(Ordering::SeqCst), 0);
        assert!(store.summaries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_is_fatal() {
        let store = MockStore::default();
        *store.fail_store.lock().unwrap() = true;
        let svc = service(store.clone(), MockProvider::replying("reply"));

        let err = svc.handle_chat(request("hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_summary_failure_does_not_fail_response() {
        let store = MockStore::default();
        *store.fail_summary.lock().unwrap() = true;
        let svc = service(store.clone(), MockProvider::replying("reply"));

        let response = svc.handle_chat(request("hello")).await.unwrap();

        assert_eq!(response.reply, "reply");
        assert_eq!(response.messages.len(), 2);
        // The exchange itself was still persisted.
        assert_eq!(store.stored.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_counts_history_plus_exchange() {
        let store = MockStore::default();
        store.history.lock().unwrap().extend(vec![
            ChatMessage {
                role: MessageRole::User,
                content: "q".to_string(),
                created_at: None,
            };
            3
        ]);
        let svc = service(store.clone(), MockProvider::replying("reply"));

        svc.handle_chat(request("hello")).await.unwrap();

        let summaries = store.summaries.lock().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].message_count, 5);
        assert_eq!(summaries[0].last_user_message, "hello");
        assert_eq!(summaries[0].last_assistant_message, "reply");
    }

    #[tokio::test]
    async fn test_exchange_turns_share_timestamp() {
        let store = MockStore::default();
        let svc = service(store.clone(), MockProvider::replying("reply"));

        svc.handle_chat(request("hello")).await.unwrap();

        let stored = store.stored.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].created_at, stored[1].created_at);
        assert_eq!(stored[0].role, MessageRole::User);
        assert_eq!(stored[1].role, MessageRole::Assistant);
        assert_eq!(stored[0].session_id, stored[1].session_id);
    }

    #[tokio::test]
    async fn test_supplied_session_id_is_kept() {
        let store = MockStore::default();
        let svc = service(store, MockProvider::replying("reply"));
        let session_id = Uuid::now_v7();

        let response = svc
            .handle_chat(ChatRequest {
                message: "hello".to_string(),
                session_id: Some(session_id),
                language: None,
            })
            .await
            .unwrap();

        assert_eq!(response.session_id, session_id);
    }

    #[tokio::test]
    async fn test_get_history_replays_store() {
        let store = MockStore::default();
        store.history.lock().unwrap().push(ChatMessage {
            role: MessageRole::User,
            content: "stored".to_string(),
            created_at: None,
        });
        let svc = service(store, MockProvider::replying("unused"));
        let session_id = Uuid::now_v7();

        let response = svc.get_history(session_id).await.unwrap();
        assert_eq!(response.session_id, session_id);
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].content, "stored");
    }
}
