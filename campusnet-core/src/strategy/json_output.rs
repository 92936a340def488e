//! JSON output strategies for different providers.
//!
//! - JsonSchemaStrategy: endpoints with native schema-constrained output (Gemini, OpenAI)
//! - JsonModeStrategy: endpoints that only support a plain JSON object mode

use crate::error::AiError;
use crate::schema::SchemaDescriptor;
use crate::types::{GenerateRequest, ResponseFormat};

/// Strategy for requesting structured output from a provider.
pub trait JsonOutputStrategy: Send + Sync {
    /// Get the strategy name for debugging
    fn name(&self) -> &str;

    /// Rewrite the request so the endpoint answers with JSON of the given shape.
    fn apply(&self, req: &mut GenerateRequest, schema: &SchemaDescriptor) -> Result<(), AiError>;
}

/// Strategy for endpoints that accept a response schema directly.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaStrategy;

impl JsonSchemaStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl JsonOutputStrategy for JsonSchemaStrategy {
    fn name(&self) -> &str {
        "JsonSchemaStrategy"
    }

    fn apply(&self, req: &mut GenerateRequest, schema: &SchemaDescriptor) -> Result<(), AiError> {
        req.response_format = Some(ResponseFormat::JsonSchema {
            name: schema.name().to_string(),
            schema: schema.to_json_schema(),
        });

        Ok(())
    }
}

/// Strategy for endpoints that only support a JSON object mode.
///
/// Sets `ResponseFormat::JsonObject` and spells the schema out in the system
/// instruction, keeping the turn sequence untouched.
#[derive(Debug, Clone, Default)]
pub struct JsonModeStrategy;

impl JsonModeStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Build a JSON instruction from a schema
    fn build_json_instruction(schema: &SchemaDescriptor) -> Result<String, AiError> {
        let schema_str = serde_json::to_string_pretty(&schema.to_json_schema())?;
        Ok(format!(
            "You must respond with valid JSON that matches this schema:\n```json\n{}\n```\n\nIMPORTANT:\n\
            1. Only return the JSON value, nothing else\n\
            2. Ensure all required fields are present\n\
            3. Follow the schema structure exactly\n\
            4. Use the correct data types for each field",
            schema_str
        ))
    }
}

impl JsonOutputStrategy for JsonModeStrategy {
    fn name(&self) -> &str {
        "JsonModeStrategy"
    }

    fn apply(&self, req: &mut GenerateRequest, schema: &SchemaDescriptor) -> Result<(), AiError> {
        req.response_format = Some(ResponseFormat::JsonObject);

        let instruction = Self::build_json_instruction(schema)?;
        req.system_instruction = Some(match req.system_instruction.take() {
            Some(existing) => format!("{}\n\n{}", existing, instruction),
            None => instruction,
        });

        Ok(())
    }
}

/// Pick the JSON output strategy for a provider id.
pub fn detect_json_strategy(provider_id: &str) -> Box<dyn JsonOutputStrategy> {
    match provider_id {
        "gemini" | "openai" => Box::new(JsonSchemaStrategy::new()),
        // Unknown or JSON-mode-only endpoints (e.g. deepseek)
        _ => Box::new(JsonModeStrategy::new()),
    }
}
