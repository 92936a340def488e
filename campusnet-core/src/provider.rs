//! Provider trait and core abstractions.

use crate::error::AiError;
use crate::types::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core provider trait for generative model endpoints.
///
/// A provider performs exactly one outbound request per `generate` call and
/// never retries. Prompt assembly, JSON output strategies and response
/// interpretation are handled above it by the runtime.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Submit a generation request and return the raw model output
    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        (**self).info()
    }

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        (**self).generate(req).await
    }
}
