//! Layer trait and abstractions.
//!
//! Layers wrap a provider with cross-cutting concerns such as logging. Each
//! layer produces a new provider, so stacks are composed statically while
//! building the runtime.

use crate::error::AiError;
use crate::provider::Provider;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping providers.
pub trait Layer<P: Provider> {
    /// The type of the layered provider
    type LayeredProvider: Provider;

    /// Wrap the inner provider with this layer
    fn layer(&self, inner: P) -> Self::LayeredProvider;
}

/// Helper trait for layered providers.
///
/// Provides forwarding defaults so implementers only override the calls they
/// intercept.
#[async_trait]
pub trait LayeredProvider: Sized + Provider {
    /// The inner provider type
    type Inner: Provider;

    /// Get a reference to the inner provider
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<ProviderInfo> {
        self.inner().info()
    }

    /// Default implementation for generate - forwards to inner
    async fn layered_generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
        self.inner().generate(req).await
    }
}

/// Implement `Provider` for a type by forwarding to its `LayeredProvider` methods.
#[macro_export]
macro_rules! impl_layered_provider {
    ($type:ident) => {
        #[async_trait::async_trait]
        impl<P: $crate::provider::Provider> $crate::provider::Provider for $type<P> {
            fn info(&self) -> std::sync::Arc<$crate::types::ProviderInfo> {
                $crate::layer::LayeredProvider::layered_info(self)
            }

            async fn generate(
                &self,
                req: $crate::types::GenerateRequest,
            ) -> Result<$crate::types::GenerateResponse, $crate::error::AiError> {
                $crate::layer::LayeredProvider::layered_generate(self, req).await
            }
        }
    };
}
