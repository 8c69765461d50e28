//! Application state wiring all services together.
//!
//! Services are generic over store/provider traits, but AppState pins
//! them to the concrete infra implementations. Everything is constructed
//! once at startup and shared read-only across request tasks.

use std::sync::Arc;
use std::time::Duration;

use wellspring_core::chat::service::ChatService;
use wellspring_core::completion::CompletionService;
use wellspring_core::health::HealthService;
use wellspring_core::newsletter::NewsletterService;
use wellspring_infra::llm::openai::OpenAiCompletionProvider;
use wellspring_infra::sqlite::history::SqliteHistoryStore;
use wellspring_infra::sqlite::newsletter::SqliteNewsletterStore;
use wellspring_infra::sqlite::pool::DatabasePool;
use wellspring_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra
/// implementations.
pub type ConcreteChatService = ChatService<SqliteHistoryStore, OpenAiCompletionProvider>;
pub type ConcreteHealthService = HealthService<SqliteHistoryStore>;
pub type ConcreteNewsletterService = NewsletterService<SqliteNewsletterStore>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub health_service: Arc<ConcreteHealthService>,
    pub newsletter_service: Arc<ConcreteNewsletterService>,
}

impl AppState {
    /// Initialize the application state: connect to the database, build
    /// the completion provider, wire services.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(&config.database_url).await?;

        let history_store = SqliteHistoryStore::new(
            pool.clone(),
            config.chat_table.clone(),
            config.summary_table.clone(),
        );
        let newsletter_store =
            SqliteNewsletterStore::new(pool.clone(), config.newsletter_table.clone());

        let provider = OpenAiCompletionProvider::new(
            &config.api_key,
            config.api_base_url.as_deref(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        let completion = CompletionService::new(
            provider,
            config.languages.clone(),
            config.default_language.clone(),
        );

        let chat_service = ChatService::new(
            history_store.clone(),
            completion,
            config.history_limit(),
        );
        let health_service = HealthService::new(history_store);
        let newsletter_service = NewsletterService::new(newsletter_store);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            health_service: Arc::new(health_service),
            newsletter_service: Arc::new(newsletter_service),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellspring_types::health::HealthStatus;

    #[tokio::test]
    async fn test_init_wires_services_against_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.database_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("api.db").display()
        );

        let state = AppState::init(&config).await.unwrap();

        // The store is reachable through the wired health service.
        let report = state.health_service.evaluate(true).await;
        assert_eq!(report.status, HealthStatus::Ok);
        assert!(report.checks.contains_key("database"));
    }
}
