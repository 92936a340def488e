//! Assistant configuration.

use campusnet_core::runtime::DEFAULT_TIMEOUT;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// System instruction for the chat assistant.
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are CampusNet AI, a helpful assistant for university students. \
You help them find teammates, suggest project ideas, give career advice, and help with technical questions. \
Keep responses concise and encouraging.";

/// Which endpoint family to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    fn api_key_var(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => f.write_str("gemini"),
            ProviderKind::OpenAi => f.write_str("openai"),
        }
    }
}

/// Configuration for the assistant.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    /// Endpoint override
    pub api_base: Option<String>,
    /// Bound on every model call
    pub request_timeout: Duration,
    pub temperature: Option<f32>,
    pub system_instruction: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_key: String::new(),
            model: ProviderKind::Gemini.default_model().to_string(),
            api_base: None,
            request_timeout: DEFAULT_TIMEOUT,
            temperature: None,
            system_instruction: CHAT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl AssistConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key/value source. Unparseable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let provider = lookup("CAMPUSNET_AI_PROVIDER")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.provider);

        let api_key = lookup(provider.api_key_var()).unwrap_or_default();

        let model = lookup("CAMPUSNET_AI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_base = lookup("CAMPUSNET_AI_BASE_URL").filter(|v| !v.trim().is_empty());

        let request_timeout = lookup("CAMPUSNET_AI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let temperature = lookup("CAMPUSNET_AI_TEMPERATURE").and_then(|v| v.parse().ok());

        Self {
            provider,
            api_key,
            model,
            api_base,
            request_timeout,
            temperature,
            system_instruction: defaults.system_instruction,
        }
    }

    /// Check if the config is usable (has an API key).
    pub fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Create a builder for configuration.
    pub fn builder() -> AssistConfigBuilder {
        AssistConfigBuilder::default()
    }
}

/// Builder for assistant configuration.
#[derive(Debug, Default)]
pub struct AssistConfigBuilder {
    config: AssistConfig,
    model_set: bool,
}

impl AssistConfigBuilder {
    /// Select the endpoint family; also resets the default model unless one was set
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.config.provider = provider;
        if !self.model_set {
            self.config.model = provider.default_model().to_string();
        }
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self.model_set = true;
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.api_base = Some(api_base.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.system_instruction = instruction.into();
        self
    }

    pub fn build(self) -> AssistConfig {
        self.config
    }
}
