//! Runtime layer for CampusNet AI.
//!
//! The runtime sits between prompt assembly and the provider interface. It is
//! responsible for:
//! - Converting prompts into provider generation requests
//! - Selecting the JSON output strategy for structured prompts
//! - Bounding every provider call with a timeout

pub mod executor;

pub use executor::{ObjectResult, RuntimeExecutor, RuntimeExecutorBuilder, DEFAULT_TIMEOUT};
