//! # CampusNet
//!
//! AI request orchestration for the CampusNet student platform.
//!
//! CampusNet builds prompts from instructions, conversation history and
//! user input, sends them to a generative model, checks structured replies
//! against a declared shape and, when anything goes wrong, hands back a safe
//! fallback value instead of an error.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! campusnet = { version = "0.1", features = ["assist"] }
//! ```
//!
//! ```ignore
//! use campusnet::assist::{AssistConfig, Assistant};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let assistant = Assistant::from_config(&AssistConfig::from_env())?;
//!
//! let reply = assistant.chat("Find a React dev", &[]).await;
//! println!("{}", reply.value());
//!
//! let idea = assistant
//!     .generate_project_idea(&["React", "Python"], &["AI"])
//!     .await
//!     .into_value();
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level pieces can be composed directly:
//!
//! ```ignore
//! use campusnet::prelude::*;
//!
//! let provider = GeminiProvider::builder().api_key("key").build()?;
//! let executor = RuntimeExecutor::builder(provider)
//!     .layer(LoggingLayer::new())
//!     .finish();
//!
//! let prompt = PromptRequest::builder("What is Rust?").build()?;
//! let result = executor.generate_text("gemini-1.5-flash", &prompt).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: providers, layers and the assistant
//! - `providers`: Gemini and OpenAI-compatible providers
//! - `layers`: Built-in layers (logging)
//! - `assist`: The four assistant operations with fallbacks
//! - `full`: All features enabled

// Re-export core types and traits
pub use campusnet_core::*;

// Re-export providers under `provider` module
#[cfg(feature = "campusnet-provider")]
pub mod provider {
    //! Model endpoint implementations.
    pub use campusnet_provider::*;
}

// Re-export layers under `layer` module
#[cfg(feature = "campusnet-layer")]
pub mod layer {
    //! Built-in provider layers.
    pub use campusnet_layer::*;
}

#[cfg(feature = "campusnet-assist")]
pub mod assist {
    //! Assistant operations and their fallbacks.
    pub use campusnet_assist::*;
}

pub mod schemars {
    //! `schemars`, for deriving the shape of custom structured responses.
    pub use ::schemars::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use campusnet::prelude::*;
    //! ```

    pub use crate::{
        AiError, ConversationTurn, ErrorKind, Layer, PromptRequest, Provider, Result, Role,
        RuntimeExecutor, SchemaDescriptor,
    };

    #[cfg(feature = "campusnet-provider")]
    pub use crate::provider::{GeminiProvider, OpenAiProvider};

    #[cfg(feature = "campusnet-layer")]
    pub use crate::layer::LoggingLayer;

    #[cfg(feature = "campusnet-assist")]
    pub use crate::assist::{AssistConfig, Assistant, Outcome};
}
