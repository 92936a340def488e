//! RuntimeExecutor implementation.
//!
//! The executor turns a [`PromptRequest`] into a provider call: it applies
//! the JSON output strategy for structured prompts and bounds every call
//! with a timeout.

use crate::error::AiError;
use crate::interpret::interpret_object;
use crate::layer::Layer;
use crate::prompt::PromptRequest;
use crate::provider::Provider;
use crate::strategy::{detect_json_strategy, JsonOutputStrategy};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Bound applied to every provider call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Type-erased provider that can be shared across threads
type BoxedProvider = Arc<dyn Provider>;

/// Builder for composing a provider with layers.
///
/// # Example
///
/// ```ignore
/// let executor = RuntimeExecutor::builder(gemini_provider)
///     .layer(LoggingLayer::new())
///     .timeout(Duration::from_secs(20))
///     .finish();
/// ```
pub struct RuntimeExecutorBuilder<P> {
    provider: P,
    json_strategy: Option<Box<dyn JsonOutputStrategy>>,
    timeout: Duration,
    temperature: Option<f32>,
}

impl<P: Provider> RuntimeExecutorBuilder<P> {
    /// Create a new builder with a provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            json_strategy: None,
            timeout: DEFAULT_TIMEOUT,
            temperature: None,
        }
    }

    /// Add a layer to wrap the provider
    pub fn layer<L>(self, layer: L) -> RuntimeExecutorBuilder<L::LayeredProvider>
    where
        L: Layer<P>,
    {
        RuntimeExecutorBuilder {
            provider: layer.layer(self.provider),
            json_strategy: self.json_strategy,
            timeout: self.timeout,
            temperature: self.temperature,
        }
    }

    /// Set a custom JSON output strategy
    ///
    /// If not set, the strategy is picked from the provider ID.
    pub fn json_strategy(mut self, strategy: Box<dyn JsonOutputStrategy>) -> Self {
        self.json_strategy = Some(strategy);
        self
    }

    /// Set the per-call timeout. A zero duration falls back to the default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// Set the sampling temperature sent with every request
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Finish building and create a RuntimeExecutor
    pub fn finish(self) -> RuntimeExecutor {
        let provider = Arc::new(self.provider);
        let provider_id = provider.info().id.clone();

        let json_strategy = self
            .json_strategy
            .unwrap_or_else(|| detect_json_strategy(&provider_id));

        RuntimeExecutor {
            provider,
            json_strategy,
            timeout: self.timeout,
            temperature: self.temperature,
        }
    }
}

/// Result of a structured generation
#[derive(Debug, Clone)]
pub struct ObjectResult<T> {
    pub object: T,
    pub usage: Usage,
    pub model: String,
}

/// Runtime executor: the single entry point for model calls.
pub struct RuntimeExecutor {
    provider: BoxedProvider,
    json_strategy: Box<dyn JsonOutputStrategy>,
    timeout: Duration,
    temperature: Option<f32>,
}

impl std::fmt::Debug for RuntimeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeExecutor")
            .field("provider", &self.provider)
            .field("json_strategy", &self.json_strategy.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RuntimeExecutor {
    /// Create a new builder
    pub fn builder<P: Provider>(provider: P) -> RuntimeExecutorBuilder<P> {
        RuntimeExecutorBuilder::new(provider)
    }

    /// Get provider information
    pub fn info(&self) -> Arc<ProviderInfo> {
        self.provider.info()
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate free text.
    pub async fn generate_text(
        &self,
        model: impl Into<String>,
        prompt: &PromptRequest,
    ) -> Result<TextResult, AiError> {
        let mut req = self.base_request(model.into(), prompt);
        req.response_format = Some(ResponseFormat::Text);

        let response = self.invoke(req).await?;

        Ok(TextResult {
            content: response.text,
            finish_reason: response.finish_reason,
            usage: response.usage,
            model: response.model,
        })
    }

    /// Generate a structured value matching the prompt's response schema.
    ///
    /// Fails with `InvalidInput` if the prompt carries no schema, and with
    /// `Parse` or `SchemaViolation` if the reply does not fit it.
    pub async fn generate_object<T: DeserializeOwned>(
        &self,
        model: impl Into<String>,
        prompt: &PromptRequest,
    ) -> Result<ObjectResult<T>, AiError> {
        let schema = prompt
            .response_schema()
            .ok_or_else(|| AiError::invalid_input("structured prompt requires a response schema"))?;

        let mut req = self.base_request(model.into(), prompt);
        self.json_strategy.apply(&mut req, schema)?;

        let response = self.invoke(req).await?;
        let object = interpret_object(&response.text, schema)?;

        Ok(ObjectResult {
            object,
            usage: response.usage,
            model: response.model,
        })
    }

    fn base_request(&self, model: String, prompt: &PromptRequest) -> GenerateRequest {
        let mut req = GenerateRequest::new(model, prompt.turns());
        req.system_instruction = prompt.system_instruction().map(str::to_string);
        req.temperature = self.temperature;
        req
    }

    /// One bounded provider call.
    async fn invoke(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let ctx = RequestContext::new(self.provider.info().id.clone(), req.model.clone());
        tracing::debug!(
            request_id = %ctx.request_id,
            provider = %ctx.provider_id,
            model = %ctx.model,
            turns = req.contents.len(),
            "invoking model"
        );

        match tokio::time::timeout(self.timeout, self.provider.generate(req)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(request_id = %ctx.request_id, "model call timed out");
                Err(AiError::timeout(format!(
                    "no response within {:?}",
                    self.timeout
                )))
            }
        }
    }
}
