//! # CampusNet Core
//!
//! Core abstractions and runtime for the CampusNet AI orchestration layer.
//!
//! This crate provides the prompt builder, response schemas, the response
//! interpreter, the runtime executor and the provider/layer traits that the concrete
//! providers and the assistant operations are built on.

pub mod error;
pub mod interpret;
pub mod layer;
pub mod prompt;
pub mod provider;
pub mod runtime;
pub mod schema;
pub mod strategy;
pub mod types;

// Re-exports
pub use error::{AiError, ErrorKind};
pub use interpret::{interpret_object, interpret_text};
pub use layer::{Layer, LayeredProvider};
pub use prompt::{PromptBuilder, PromptRequest};
pub use provider::Provider;
pub use runtime::{ObjectResult, RuntimeExecutor};
pub use schema::SchemaDescriptor;
pub use strategy::{JsonModeStrategy, JsonOutputStrategy, JsonSchemaStrategy};
pub use types::*;

/// Result type alias for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
