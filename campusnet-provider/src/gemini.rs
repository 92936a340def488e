//! Gemini provider over the `generateContent` REST endpoint.
//!
//! The system instruction travels in `systemInstruction`, conversation turns
//! in `contents`, and schema-constrained output is requested through
//! `generationConfig.responseSchema`.

use campusnet_core::error::AiError;
use campusnet_core::provider::Provider;
use campusnet_core::types::*;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Default REST base for the Gemini API
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("info", &self.info)
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.response_mime_type.is_none()
            && self.response_schema.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    response_id: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiProvider {
    /// Create a builder for configuration options
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::default()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    /// Build the wire body from our request
    fn build_body(req: &GenerateRequest) -> GeminiRequest {
        let contents = req
            .contents
            .iter()
            .map(|turn| GeminiContent {
                role: Some(
                    match turn.role {
                        Role::User => "user",
                        Role::Model => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(turn.text.clone()),
                }],
            })
            .collect();

        let system_instruction = req.system_instruction.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(text.clone()),
            }],
        });

        let mut config = GenerationConfig {
            temperature: req.temperature,
            max_output_tokens: req.max_output_tokens,
            ..Default::default()
        };
        match &req.response_format {
            Some(ResponseFormat::JsonObject) => {
                config.response_mime_type = Some("application/json".to_string());
            }
            Some(ResponseFormat::JsonSchema { schema, .. }) => {
                config.response_mime_type = Some("application/json".to_string());
                config.response_schema = Some(to_gemini_schema(schema));
            }
            Some(ResponseFormat::Text) | None => {}
        }

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: (!config.is_empty()).then_some(config),
        }
    }

    /// Convert the wire response to our GenerateResponse
    fn convert_response(response: GeminiResponse, requested_model: &str) -> GenerateResponse {
        let first = response.candidates.into_iter().next();

        let finish_reason = match (&first, &response.prompt_feedback) {
            (None, Some(PromptFeedback {
                block_reason: Some(_),
            })) => FinishReason::ContentFilter,
            (Some(candidate), _) => match candidate.finish_reason.as_deref() {
                None | Some("STOP") => FinishReason::Stop,
                Some("MAX_TOKENS") => FinishReason::Length,
                Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => {
                    FinishReason::ContentFilter
                }
                Some(other) => FinishReason::Other(other.to_string()),
            },
            (None, _) => FinishReason::Other("no_candidates".to_string()),
        };

        let text = first
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = response.usage_metadata.map_or_else(Usage::default, |u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        GenerateResponse {
            id: response
                .response_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            model: response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            text,
            finish_reason,
            usage,
        }
    }
}

/// Translate standard JSON Schema into the OpenAPI subset Gemini accepts:
/// upper-case type names, and only the keywords the endpoint understands.
fn to_gemini_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in map {
        match key.as_str() {
            "type" => match value {
                Value::String(t) => {
                    out.insert(key.clone(), Value::String(t.to_uppercase()));
                }
                // `["T", "null"]` becomes `T` plus `nullable`
                Value::Array(types) => {
                    let mut nullable = false;
                    for t in types.iter().filter_map(Value::as_str) {
                        if t == "null" {
                            nullable = true;
                        } else {
                            out.insert(key.clone(), Value::String(t.to_uppercase()));
                        }
                    }
                    if nullable {
                        out.insert("nullable".to_string(), Value::Bool(true));
                    }
                }
                _ => {}
            },
            "properties" => {
                let properties = value
                    .as_object()
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                            .collect::<Map<_, _>>()
                    })
                    .unwrap_or_default();
                out.insert(key.clone(), Value::Object(properties));
            }
            "items" => {
                out.insert(key.clone(), to_gemini_schema(value));
            }
            "required" | "description" | "minimum" | "maximum" | "minItems" | "maxItems"
            | "enum" | "nullable" => {
                out.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    Value::Object(out)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let body = Self::build_body(&req);

        let response = self
            .client
            .post(self.endpoint(&req.model))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(AiError::status(status.as_u16(), message));
        }

        let response: GeminiResponse = response.json().await?;
        Ok(Self::convert_response(response, &req.model))
    }
}

/// Builder for the Gemini provider
#[derive(Default)]
pub struct GeminiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    /// Set API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the HTTP client timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<GeminiProvider, AiError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::configuration("API key is required"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&api_key)
            .map_err(|e| AiError::configuration(format!("Invalid API key: {}", e)))?;
        headers.insert("x-goog-api-key", key);

        let mut client = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(GeminiProvider {
            client: client.build()?,
            api_base: self
                .api_base
                .unwrap_or_else(|| GEMINI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            info: Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: "Google Gemini".to_string(),
            }),
        })
    }
}
