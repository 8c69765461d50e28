//! OpenAI-compatible completion provider implementation.
//!
//! Uses [`async_openai`] for type-safe request/response handling. All
//! defensive parsing of the upstream payload happens here: the rest of
//! the system only ever sees a non-empty reply string or a
//! [`CompletionError`].

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse,
};
use secrecy::{ExposeSecret, SecretString};

use wellspring_core::completion::CompletionProvider;
use wellspring_types::chat::{MessageRole, PromptMessage};
use wellspring_types::error::CompletionError;

/// Provider for any OpenAI-compatible chat completion endpoint.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompletionProvider {
    client: Client<OpenAIConfig>,
    model: String,
    request_timeout: Duration,
}

impl OpenAiCompletionProvider {
    /// Create a provider from configuration values.
    ///
    /// The client is constructed once and reused for the process
    /// lifetime; it holds no per-request state.
    pub fn new(
        api_key: &SecretString,
        api_base_url: Option<&str>,
        model: String,
        request_timeout: Duration,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(base_url) = api_base_url {
            config = config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(config),
            model,
            request_timeout,
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from assembled prompt
    /// messages.
    fn build_request(&self, messages: &[PromptMessage]) -> CreateChatCompletionRequest {
        let oai_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(|msg| match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            })
            .collect();

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: oai_messages,
            ..Default::default()
        }
    }
}

impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, CompletionError> {
        let request = self.build_request(messages);

        let response = tokio::time::timeout(
            self.request_timeout,
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| CompletionError::Timeout(self.request_timeout.as_secs()))?
        .map_err(|e| CompletionError::Provider(e.to_string()))?;

        extract_reply(&response)
    }
}

/// Pull the reply text out of an upstream response.
///
/// Rejects anything without a usable message payload (no choices, or an
/// empty/absent content field) instead of passing a partial shape inward.
fn extract_reply(response: &CreateChatCompletionResponse) -> Result<String, CompletionError> {
    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }

    Ok(content)
}
