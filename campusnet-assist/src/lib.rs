//! # CampusNet Assist
//!
//! The CampusNet AI assistant: chat, project idea generation, team building
//! and resume optimization on top of the core runtime.
//!
//! Every operation returns an [`Outcome`]. A failed call (unreachable model,
//! timeout, malformed or invalid reply) never surfaces as an error; the
//! operation's fallback value is returned instead.
//!
//! ```ignore
//! use campusnet_assist::{AssistConfig, Assistant};
//!
//! let assistant = Assistant::from_config(&AssistConfig::from_env())?;
//! let reply = assistant.chat("Find a React dev", &[]).await.into_value();
//! ```

pub mod assistant;
pub mod config;
pub mod domain;
pub mod fallback;
pub mod outcome;
pub mod shapes;
pub mod slot;

// Re-exports
pub use assistant::{Assistant, Operation};
pub use config::{AssistConfig, AssistConfigBuilder, ProviderKind, CHAT_SYSTEM_INSTRUCTION};
pub use domain::{
    Candidate, CandidateRole, ExperienceEntry, ProjectEntry, ProjectIdea, ResumeContent,
    ResumeOptimization, TeamMember, TeamSelection,
};
pub use outcome::Outcome;
pub use slot::{CallPhase, CallSlot, CallState, SlotGuard};
