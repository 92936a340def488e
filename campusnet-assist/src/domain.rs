//! Records exchanged with the assistant operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether a pool member is a student or a mentor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateRole {
    Student,
    Mentor,
}

/// A member of the caller-supplied candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub skills: Vec<String>,
    pub role: CandidateRole,
}

/// A generated project suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectIdea {
    /// Short project name
    pub title: String,
    /// What the project does, in two sentences
    pub description: String,
    /// Concrete features to build
    #[schemars(length(min = 1))]
    pub features: Vec<String>,
}

/// One role assignment as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSelection {
    pub role: String,
    /// Id of the chosen student
    pub user_id: String,
    /// Why this student fits the role
    pub reason: String,
    #[schemars(range(min = 0.0, max = 100.0))]
    pub compatibility: f64,
}

/// A role assignment resolved against the candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub role: String,
    pub candidate: Candidate,
    pub reason: String,
    /// 0-100, informational only
    pub compatibility: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub role: String,
    pub description: String,
}

/// Resume sections submitted for optimization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

impl ResumeContent {
    /// True when there is nothing to review
    pub fn is_blank(&self) -> bool {
        self.summary.trim().is_empty() && self.experience.is_empty() && self.projects.is_empty()
    }
}

/// Resume review result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResumeOptimization {
    /// Overall quality, 0-100
    #[schemars(range(min = 0.0, max = 100.0))]
    pub score: f64,
    /// Specific, actionable improvements
    #[schemars(length(min = 1))]
    pub suggestions: Vec<String>,
}
