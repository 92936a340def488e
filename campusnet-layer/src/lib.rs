//! # CampusNet Layers
//!
//! Built-in layers for CampusNet AI.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs every model invocation with timing information
//!
//! Calls are never retried; a failed call ends in the caller's fallback.
//!
//! ## Usage
//!
//! ```ignore
//! use campusnet_core::RuntimeExecutor;
//! use campusnet_layer::LoggingLayer;
//!
//! let executor = RuntimeExecutor::builder(provider)
//!     .layer(LoggingLayer::new())
//!     .finish();
//! ```

pub mod logging;

// Re-exports
pub use logging::{LoggingLayer, LoggingProvider};
