//! Strategy layer for provider-specific behaviors.
//!
//! Endpoints differ in how they accept a response schema; the strategies
//! here hide that difference from the runtime.

pub mod json_output;

pub use json_output::{detect_json_strategy, JsonModeStrategy, JsonOutputStrategy, JsonSchemaStrategy};
