//! Logging layer for provider operations.

use campusnet_core::error::AiError;
use campusnet_core::layer::{Layer, LayeredProvider};
use campusnet_core::provider::Provider;
use campusnet_core::types::*;
use async_trait::async_trait;
use std::fmt::Debug;

/// Logging layer that logs provider operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[CampusNet AI]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    prefix: String,
}

#[async_trait]
impl<P: Provider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let structured = !matches!(
            req.response_format,
            None | Some(ResponseFormat::Text)
        );
        tracing::debug!(
            "{} generate request: model={}, turns={}, structured={}",
            self.prefix,
            req.model,
            req.contents.len(),
            structured
        );

        let start = std::time::Instant::now();
        let result = self.inner.generate(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    "{} generate success: id={}, tokens={}, elapsed={:?}",
                    self.prefix,
                    response.id,
                    response.usage.total_tokens,
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!(
                    "{} generate error ({}): {}, elapsed={:?}",
                    self.prefix,
                    e.kind(),
                    e,
                    elapsed
                );
            }
        }

        result
    }
}

campusnet_core::impl_layered_provider!(LoggingProvider);
