//! # CampusNet Providers
//!
//! Model endpoint implementations for CampusNet AI.

pub mod gemini;
pub mod openai;

// Re-exports
pub use gemini::{GeminiBuilder, GeminiProvider, GEMINI_API_BASE};
pub use openai::{OpenAiBuilder, OpenAiProvider};

use campusnet_core::error::AiError;

/// Create a DeepSeek provider (OpenAI-compatible)
///
/// DeepSeek speaks the OpenAI protocol on a different endpoint and only
/// supports plain JSON mode, which its `deepseek` provider ID selects.
///
/// # Example
///
/// ```ignore
/// use campusnet_provider::deepseek;
///
/// let provider = deepseek("your-api-key")?;
/// ```
pub fn deepseek(api_key: impl Into<String>) -> Result<OpenAiProvider, AiError> {
    OpenAiProvider::builder()
        .api_key(api_key)
        .api_base("https://api.deepseek.com/v1")
        .build_with_id("deepseek", "DeepSeek")
}
