//! OpenAI-compatible provider using the async-openai crate.
//!
//! Works against any endpoint speaking the chat completions protocol
//! (OpenAI, DeepSeek). The out-of-band system instruction becomes a leading
//! system message; model turns become assistant messages.

use campusnet_core::error::AiError;
use campusnet_core::provider::Provider;
use campusnet_core::types::*;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    ResponseFormat as OpenAIResponseFormat,
    ResponseFormatJsonSchema as OpenAIResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI provider using async-openai
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("info", &self.info)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a builder for configuration options
    pub fn builder() -> OpenAiBuilder {
        OpenAiBuilder::default()
    }

    fn system_message(text: &str) -> Result<ChatCompletionRequestMessage, AiError> {
        let msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(text.to_string())
            .build()
            .map_err(|e| AiError::provider(format!("Failed to build system message: {}", e)))?;
        Ok(ChatCompletionRequestMessage::System(msg))
    }

    /// Convert a conversation turn to an OpenAI chat message
    fn convert_turn(turn: &ConversationTurn) -> Result<ChatCompletionRequestMessage, AiError> {
        match turn.role {
            Role::User => {
                let msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.text.clone())
                    .build()
                    .map_err(|e| {
                        AiError::provider(format!("Failed to build user message: {}", e))
                    })?;
                Ok(ChatCompletionRequestMessage::User(msg))
            }
            Role::Model => {
                let msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.text.clone())
                    .build()
                    .map_err(|e| {
                        AiError::provider(format!("Failed to build assistant message: {}", e))
                    })?;
                Ok(ChatCompletionRequestMessage::Assistant(msg))
            }
        }
    }

    /// Convert our ResponseFormat to OpenAI's ResponseFormat
    fn convert_response_format(format: &ResponseFormat) -> OpenAIResponseFormat {
        match format {
            ResponseFormat::Text => OpenAIResponseFormat::Text,
            ResponseFormat::JsonObject => OpenAIResponseFormat::JsonObject,
            ResponseFormat::JsonSchema { name, schema } => OpenAIResponseFormat::JsonSchema {
                json_schema: OpenAIResponseFormatJsonSchema {
                    name: name.clone(),
                    schema: Some(schema.clone()),
                    // Strict mode rejects optional properties; the interpreter validates instead.
                    strict: Some(false),
                    description: None,
                },
            },
        }
    }

    /// Build CreateChatCompletionRequest from our GenerateRequest
    fn build_request(req: &GenerateRequest) -> Result<CreateChatCompletionRequest, AiError> {
        let mut messages = Vec::with_capacity(req.contents.len() + 1);
        if let Some(instruction) = &req.system_instruction {
            messages.push(Self::system_message(instruction)?);
        }
        for turn in &req.contents {
            messages.push(Self::convert_turn(turn)?);
        }

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&req.model).messages(messages);

        if let Some(max_tokens) = req.max_output_tokens {
            builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = req.temperature {
            builder.temperature(temperature);
        }
        if let Some(response_format) = &req.response_format {
            builder.response_format(Self::convert_response_format(response_format));
        }

        builder
            .build()
            .map_err(|e| AiError::provider(format!("Failed to build request: {}", e)))
    }

    /// Convert an OpenAI response to our GenerateResponse
    fn convert_response(
        response: async_openai::types::CreateChatCompletionResponse,
    ) -> GenerateResponse {
        let first = response.choices.into_iter().next();

        let finish_reason = first
            .as_ref()
            .and_then(|choice| choice.finish_reason.clone())
            .map_or(FinishReason::Stop, |r| match r {
                async_openai::types::FinishReason::Stop => FinishReason::Stop,
                async_openai::types::FinishReason::Length => FinishReason::Length,
                async_openai::types::FinishReason::ContentFilter => FinishReason::ContentFilter,
                _ => FinishReason::Other("unknown".to_string()),
            });

        let text = first
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let usage = response.usage.map_or_else(Usage::default, |u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        GenerateResponse {
            id: response.id,
            model: response.model,
            text,
            finish_reason,
            usage,
        }
    }

    fn convert_error(err: OpenAIError) -> AiError {
        match err {
            OpenAIError::ApiError(api) => {
                AiError::provider(format!("OpenAI API error: {}", api.message))
            }
            OpenAIError::InvalidArgument(msg) => AiError::invalid_input(msg),
            other => AiError::network(other.to_string()),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let openai_req = Self::build_request(&req)?;

        let response = self
            .client
            .chat()
            .create(openai_req)
            .await
            .map_err(Self::convert_error)?;

        Ok(Self::convert_response(response))
    }
}

/// Builder for OpenAI provider with custom configuration
#[derive(Default)]
pub struct OpenAiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
}

impl OpenAiBuilder {
    /// Set API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (for OpenAI-compatible APIs like DeepSeek)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<OpenAiProvider, AiError> {
        self.build_with_id("openai", "OpenAI")
    }

    /// Build a provider with a custom provider ID and name
    ///
    /// The ID also selects the JSON output strategy, so OpenAI-compatible
    /// endpoints without schema support should use their own ID.
    pub fn build_with_id(
        self,
        provider_id: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Result<OpenAiProvider, AiError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::configuration("API key is required"))?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);

        if let Some(api_base) = self.api_base {
            config = config.with_api_base(api_base);
        }

        Ok(OpenAiProvider {
            client: Client::with_config(config),
            info: Arc::new(ProviderInfo {
                id: provider_id.into(),
                name: provider_name.into(),
            }),
        })
    }
}
