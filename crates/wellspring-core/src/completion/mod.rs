//! Completion provider trait and prompt assembly.
//!
//! The provider trait is the narrow boundary to the upstream model
//! service: it takes an assembled prompt and returns a clean reply text
//! or a [`CompletionError`]. All wire-shape validation happens inside
//! the implementation, so the orchestrator never reasons about the
//! provider's payload format.

use std::collections::HashMap;

use tracing::{debug, error};
use wellspring_types::chat::{ChatMessage, MessageRole, PromptMessage};
use wellspring_types::error::CompletionError;

/// Trait for completion provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in wellspring-infra (e.g., `OpenAiCompletionProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Request a single completion for the assembled prompt.
    fn complete(
        &self,
        messages: &[PromptMessage],
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}

/// Select the system preamble for a requested language.
///
/// Falls back to the default language when the requested one is absent
/// or unrecognized. Returns `None` only if the default itself is missing
/// from the map (a misconfiguration; callers treat it as no preamble).
pub fn select_preamble<'a>(
    languages: &'a HashMap<String, String>,
    default_language: &str,
    requested: Option<&str>,
) -> Option<&'a str> {
    requested
        .and_then(|lang| languages.get(lang))
        .or_else(|| languages.get(default_language))
        .map(String::as_str)
}

/// Assemble the message sequence sent to the provider.
///
/// The system preamble always comes first, even when the stored history
/// already contains a system turn. History entries with empty content
/// are dropped; the remaining ones keep their original order. The new
/// user turn goes last.
pub fn build_prompt(
    preamble: Option<&str>,
    history: &[ChatMessage],
    prompt: &str,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(preamble) = preamble {
        messages.push(PromptMessage {
            role: MessageRole::System,
            content: preamble.to_string(),
        });
    }

    for msg in history {
        if msg.content.is_empty() {
            continue;
        }
        messages.push(PromptMessage {
            role: msg.role,
            content: msg.content.clone(),
        });
    }

    messages.push(PromptMessage {
        role: MessageRole::User,
        content: prompt.to_string(),
    });

    messages
}

/// Turns a (history, prompt, language) triple into a single assistant
/// reply, isolating prompt assembly and provider invocation.
pub struct CompletionService<P: CompletionProvider> {
    provider: P,
    languages: HashMap<String, String>,
    default_language: String,
}

impl<P: CompletionProvider> CompletionService<P> {
    pub fn new(provider: P, languages: HashMap<String, String>, default_language: String) -> Self {
        Self {
            provider,
            languages,
            default_language,
        }
    }

    /// Generate a reply grounded in the supplied history.
    ///
    /// The returned text is the provider's reply verbatim; no
    /// post-processing or truncation is applied.
    pub async fn generate_reply(
        &self,
        history: &[ChatMessage],
        prompt: &str,
        language: Option<&str>,
    ) -> Result<String, CompletionError> {
        let preamble = select_preamble(&self.languages, &self.default_language, language);
        let messages = build_prompt(preamble, history, prompt);

        debug!(message_count = messages.len(), "requesting completion");

        match self.provider.complete(&messages).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                error!(error = %err, "completion provider call failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("en".to_string(), "English preamble".to_string());
        map.insert("de".to_string(), "Deutsche Einleitung".to_string());
        map
    }

    fn history_msg(role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_select_preamble_known_language() {
        let langs = languages();
        assert_eq!(
            select_preamble(&langs, "en", Some("de")),
            Some("Deutsche Einleitung")
        );
    }

    #[test]
    fn test_select_preamble_unknown_falls_back() {
        let langs = languages();
        assert_eq!(
            select_preamble(&langs, "en", Some("fr")),
            Some("English preamble")
        );
        assert_eq!(select_preamble(&langs, "en", None), Some("English preamble"));
    }

    #[test]
    fn test_select_preamble_missing_default() {
        let langs = languages();
        assert_eq!(select_preamble(&langs, "xx", None), None);
    }

    #[test]
    fn test_build_prompt_preamble_first_new_turn_last() {
        let history = vec![
            history_msg(MessageRole::System, "stored system turn"),
            history_msg(MessageRole::User, "earlier question"),
            history_msg(MessageRole::Assistant, "earlier answer"),
        ];
        let messages = build_prompt(Some("the preamble"), &history, "new question");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, "the preamble");
        // Stored history keeps its order after the preamble.
        assert_eq!(messages[1].content, "stored system turn");
        assert_eq!(messages[2].content, "earlier question");
        assert_eq!(messages[3].content, "earlier answer");
        assert_eq!(messages[4].role, MessageRole::User);
        assert_eq!(messages[4].content, "new question");
    }

    #[test]
    fn test_build_prompt_drops_empty_content() {
        let history = vec![
            history_msg(MessageRole::User, ""),
            history_msg(MessageRole::Assistant, "kept"),
        ];
        let messages = build_prompt(None, &history, "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "kept");
        assert_eq!(messages[1].content, "hello");
    }

    struct EchoProvider;

    impl CompletionProvider for EchoProvider {
        async fn complete(&self, messages: &[PromptMessage]) -> Result<String, CompletionError> {
            Ok(format!("echo:{}", messages.last().unwrap().content))
        }
    }

    struct FailingProvider;

    impl CompletionProvider for FailingProvider {
        async fn complete(&self, _messages: &[PromptMessage]) -> Result<String, CompletionError> {
            Err(CompletionError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_generate_reply_returns_verbatim() {
        let service = CompletionService::new(EchoProvider, languages(), "en".to_string());
        let reply = service.generate_reply(&[], "ping", None).await.unwrap();
        assert_eq!(reply, "echo:ping");
    }

    #[tokio::test]
    async fn test_generate_reply_propagates_provider_error() {
        let service = CompletionService::new(FailingProvider, languages(), "en".to_string());
        let err = service.generate_reply(&[], "ping", None).await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }
}
