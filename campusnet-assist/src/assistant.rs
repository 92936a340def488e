//! The four assistant operations.
//!
//! Every operation has a total contract: it returns an [`Outcome`] carrying
//! either the model's answer or the fallback value, never an error.

use crate::config::{AssistConfig, ProviderKind};
use crate::domain::{
    Candidate, ProjectIdea, ResumeContent, ResumeOptimization, TeamMember, TeamSelection,
};
use crate::fallback;
use crate::outcome::Outcome;
use crate::shapes;
use crate::slot::CallSlot;
use campusnet_core::error::AiError;
use campusnet_core::interpret::interpret_text;
use campusnet_core::prompt::PromptRequest;
use campusnet_core::provider::Provider;
use campusnet_core::runtime::RuntimeExecutor;
use campusnet_core::types::ConversationTurn;
use campusnet_layer::LoggingLayer;
use campusnet_provider::{GeminiProvider, OpenAiProvider};
use serde::Serialize;
use std::fmt;
use std::future::Future;

const IDEA_INSTRUCTION: &str = "You are CampusNet AI. Suggest one realistic university project \
that a small student team can build in a semester. Answer with a short title, a two sentence \
description and a list of concrete features.";

const TEAM_INSTRUCTION: &str = "You are CampusNet AI. Build a project team from the listed \
students. Pick exactly one student per role, only use ids from the list, and explain each \
choice in one sentence with a compatibility score from 0 to 100.";

const RESUME_INSTRUCTION: &str = "You are CampusNet AI, a career coach for university students. \
Score the resume from 0 to 100 and give specific, actionable suggestions to improve it.";

/// Assistant operation kinds, one call slot each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Chat,
    ProjectIdea,
    TeamBuilder,
    ResumeOptimizer,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Chat => "chat",
            Operation::ProjectIdea => "project_idea",
            Operation::TeamBuilder => "team_builder",
            Operation::ResumeOptimizer => "resume_optimizer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pool entry as shown to the model.
#[derive(Serialize)]
struct PoolEntry<'a> {
    id: &'a str,
    name: &'a str,
    role: crate::domain::CandidateRole,
    skills: &'a [String],
}

/// CampusNet AI assistant.
///
/// Share it behind an `Arc`; different operations may run concurrently but
/// each operation accepts one call at a time.
#[derive(Debug)]
pub struct Assistant {
    executor: RuntimeExecutor,
    model: String,
    chat_instruction: String,
    chat_slot: CallSlot,
    idea_slot: CallSlot,
    team_slot: CallSlot,
    resume_slot: CallSlot,
}

impl Assistant {
    /// Create an assistant over a configured executor
    pub fn new(executor: RuntimeExecutor, model: impl Into<String>) -> Self {
        Self {
            executor,
            model: model.into(),
            chat_instruction: crate::config::CHAT_SYSTEM_INSTRUCTION.to_string(),
            chat_slot: CallSlot::new(Operation::Chat.as_str()),
            idea_slot: CallSlot::new(Operation::ProjectIdea.as_str()),
            team_slot: CallSlot::new(Operation::TeamBuilder.as_str()),
            resume_slot: CallSlot::new(Operation::ResumeOptimizer.as_str()),
        }
    }

    /// Build the provider stack described by `config`.
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn from_config(config: &AssistConfig) -> Result<Self, AiError> {
        if !config.is_valid() {
            return Err(AiError::configuration(format!(
                "missing API key for provider {}",
                config.provider
            )));
        }

        let executor = match config.provider {
            ProviderKind::Gemini => {
                let mut builder = GeminiProvider::builder()
                    .api_key(config.api_key.clone())
                    .timeout(config.request_timeout);
                if let Some(api_base) = &config.api_base {
                    builder = builder.api_base(api_base.clone());
                }
                executor_for(builder.build()?, config)
            }
            ProviderKind::OpenAi => {
                let mut builder = OpenAiProvider::builder().api_key(config.api_key.clone());
                if let Some(api_base) = &config.api_base {
                    builder = builder.api_base(api_base.clone());
                }
                executor_for(builder.build()?, config)
            }
        };

        Ok(Self::new(executor, config.model.clone())
            .with_chat_instruction(config.system_instruction.clone()))
    }

    /// Replace the chat system instruction
    pub fn with_chat_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.chat_instruction = instruction.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn executor(&self) -> &RuntimeExecutor {
        &self.executor
    }

    /// Call slot of an operation
    pub fn slot(&self, op: Operation) -> &CallSlot {
        match op {
            Operation::Chat => &self.chat_slot,
            Operation::ProjectIdea => &self.idea_slot,
            Operation::TeamBuilder => &self.team_slot,
            Operation::ResumeOptimizer => &self.resume_slot,
        }
    }

    /// Answer a chat message in the context of the prior conversation.
    ///
    /// Falls back to a fixed apology when the model cannot be reached. A
    /// call made while another chat is still in flight gets the same apology
    /// without contacting the model; [`Outcome::cause`] then reports
    /// [`ErrorKind::Busy`](campusnet_core::ErrorKind::Busy).
    pub async fn chat(&self, user_text: &str, history: &[ConversationTurn]) -> Outcome<String> {
        self.run(
            Operation::Chat,
            self.request_chat(user_text, history),
            fallback::chat,
        )
        .await
    }

    /// Suggest a project for the given skills and interests.
    pub async fn generate_project_idea<S: AsRef<str>>(
        &self,
        skills: &[S],
        interests: &[S],
    ) -> Outcome<Option<ProjectIdea>> {
        self.run(
            Operation::ProjectIdea,
            self.request_idea(skills, interests),
            fallback::project_idea,
        )
        .await
    }

    /// Staff each role with a member of `pool`.
    ///
    /// On failure the team is derived round-robin from the pool, so a
    /// non-empty pool always yields one member per role.
    pub async fn generate_team<S: AsRef<str>>(
        &self,
        project_description: &str,
        roles: &[S],
        pool: &[Candidate],
    ) -> Outcome<Vec<TeamMember>> {
        self.run(
            Operation::TeamBuilder,
            self.request_team(project_description, roles, pool),
            || fallback::team(roles, pool),
        )
        .await
    }

    /// Score a resume and suggest improvements.
    pub async fn optimize_resume(
        &self,
        resume: &ResumeContent,
    ) -> Outcome<Option<ResumeOptimization>> {
        self.run(
            Operation::ResumeOptimizer,
            self.request_resume(resume),
            fallback::resume_optimization,
        )
        .await
    }

    async fn request_chat(
        &self,
        user_text: &str,
        history: &[ConversationTurn],
    ) -> Result<String, AiError> {
        let prompt = PromptRequest::builder(user_text)
            .system_instruction(self.chat_instruction.as_str())
            .history(history.iter().cloned())
            .build()?;
        let result = self
            .executor
            .generate_text(self.model.as_str(), &prompt)
            .await?;
        Ok(interpret_text(&result.content))
    }

    async fn request_idea<S: AsRef<str>>(
        &self,
        skills: &[S],
        interests: &[S],
    ) -> Result<Option<ProjectIdea>, AiError> {
        if skills.is_empty() && interests.is_empty() {
            return Err(AiError::invalid_input(
                "project idea needs at least one skill or interest",
            ));
        }
        let text = format!(
            "Skills: {}\nInterests: {}",
            join_or_none(skills),
            join_or_none(interests)
        );
        let prompt = PromptRequest::builder(text)
            .system_instruction(IDEA_INSTRUCTION)
            .response_schema(shapes::project_idea())
            .build()?;
        let result = self
            .executor
            .generate_object::<ProjectIdea>(self.model.as_str(), &prompt)
            .await?;
        Ok(Some(result.object))
    }

    async fn request_team<S: AsRef<str>>(
        &self,
        project_description: &str,
        roles: &[S],
        pool: &[Candidate],
    ) -> Result<Vec<TeamMember>, AiError> {
        if project_description.trim().is_empty() {
            return Err(AiError::invalid_input("project description must not be empty"));
        }
        if roles.is_empty() {
            return Err(AiError::invalid_input("at least one role is required"));
        }
        if pool.is_empty() {
            return Err(AiError::invalid_input("candidate pool is empty"));
        }

        let prompt = PromptRequest::builder(team_prompt(project_description, roles, pool)?)
            .system_instruction(TEAM_INSTRUCTION)
            .response_schema(shapes::team_selection())
            .build()?;
        let result = self
            .executor
            .generate_object::<Vec<TeamSelection>>(self.model.as_str(), &prompt)
            .await?;
        Ok(resolve_team(result.object, pool))
    }

    async fn request_resume(
        &self,
        resume: &ResumeContent,
    ) -> Result<Option<ResumeOptimization>, AiError> {
        if resume.is_blank() {
            return Err(AiError::invalid_input("resume is empty"));
        }
        let text = format!(
            "Review this resume:\n{}",
            serde_json::to_string_pretty(resume)?
        );
        let prompt = PromptRequest::builder(text)
            .system_instruction(RESUME_INSTRUCTION)
            .response_schema(shapes::resume_optimization())
            .build()?;
        let result = self
            .executor
            .generate_object::<ResumeOptimization>(self.model.as_str(), &prompt)
            .await?;
        Ok(Some(result.object))
    }

    /// Run one call inside the operation's slot, substituting the fallback
    /// value on any error.
    async fn run<T, F>(
        &self,
        op: Operation,
        call: impl Future<Output = Result<T, AiError>>,
        fallback: F,
    ) -> Outcome<T>
    where
        F: FnOnce() -> T,
    {
        let Some(guard) = self.slot(op).try_begin() else {
            let err = AiError::busy(format!("{} call already in flight", op));
            tracing::warn!(operation = %op, error = %err, "using fallback");
            return Outcome::Fallback {
                value: fallback(),
                cause: err.kind(),
            };
        };

        match call.await {
            Ok(value) => {
                guard.succeed();
                tracing::debug!(operation = %op, "call succeeded");
                Outcome::Success(value)
            }
            Err(err) => {
                guard.fail();
                tracing::warn!(
                    operation = %op,
                    kind = %err.kind(),
                    error = %err,
                    "call failed, using fallback"
                );
                Outcome::Fallback {
                    value: fallback(),
                    cause: err.kind(),
                }
            }
        }
    }
}

fn executor_for<P: Provider>(provider: P, config: &AssistConfig) -> RuntimeExecutor {
    let mut builder = RuntimeExecutor::builder(provider)
        .layer(LoggingLayer::new())
        .timeout(config.request_timeout);
    if let Some(temperature) = config.temperature {
        builder = builder.temperature(temperature);
    }
    builder.finish()
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

fn team_prompt<S: AsRef<str>>(
    description: &str,
    roles: &[S],
    pool: &[Candidate],
) -> Result<String, AiError> {
    let entries: Vec<PoolEntry<'_>> = pool
        .iter()
        .map(|c| PoolEntry {
            id: &c.id,
            name: &c.name,
            role: c.role,
            skills: &c.skills,
        })
        .collect();

    Ok(format!(
        "Project: {}\nRoles to fill: {}\nAvailable students: {}",
        description,
        join_or_none(roles),
        serde_json::to_string(&entries)?
    ))
}

/// Map model selections onto pool members. Unknown ids resolve to
/// `pool[i % pool.len()]`; `pool` must not be empty.
fn resolve_team(selections: Vec<TeamSelection>, pool: &[Candidate]) -> Vec<TeamMember> {
    selections
        .into_iter()
        .enumerate()
        .map(|(i, selection)| {
            let candidate = match pool.iter().find(|c| c.id == selection.user_id) {
                Some(candidate) => candidate,
                None => {
                    tracing::debug!(
                        user_id = %selection.user_id,
                        "model picked an unknown student, substituting from pool"
                    );
                    &pool[i % pool.len()]
                }
            };
            TeamMember {
                role: selection.role,
                candidate: candidate.clone(),
                reason: selection.reason,
                compatibility: selection.compatibility.round().clamp(0.0, 100.0) as u8,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateRole, ExperienceEntry};
    use crate::fallback::{CHAT_FALLBACK, FALLBACK_COMPATIBILITY, TEAM_FALLBACK_REASON};
    use crate::slot::CallPhase;
    use async_trait::async_trait;
    use campusnet_core::error::ErrorKind;
    use campusnet_core::types::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Provider answering every call with the same reply or error.
    #[derive(Debug)]
    struct Canned {
        reply: Result<String, ErrorKind>,
        gate: Option<Arc<Notify>>,
        delay: Option<Duration>,
        calls: Mutex<Vec<GenerateRequest>>,
    }

    impl Canned {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                gate: None,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                reply: Err(ErrorKind::Network),
                gate: None,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn slow(text: &str, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::replying(text)
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Provider for Canned {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: "Canned".to_string(),
            })
        }

        async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, AiError> {
            let model = req.model.clone();
            self.calls.lock().unwrap().push(req);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.reply {
                Ok(text) => Ok(GenerateResponse {
                    id: "resp".to_string(),
                    model,
                    text: text.clone(),
                    finish_reason: FinishReason::Stop,
                    usage: Usage::default(),
                }),
                Err(_) => Err(AiError::network("connection refused")),
            }
        }
    }

    fn assistant(provider: Arc<Canned>) -> Assistant {
        Assistant::new(
            RuntimeExecutor::builder(provider).finish(),
            "gemini-1.5-flash",
        )
    }

    fn pool(n: usize) -> Vec<Candidate> {
        let names = ["Alex Chen", "Sarah Jones", "Mike Ross", "Priya Patel"];
        (0..n)
            .map(|i| Candidate {
                id: (i + 1).to_string(),
                name: names[i % names.len()].to_string(),
                avatar: format!("https://picsum.photos/seed/{}/200", i + 1),
                skills: vec!["React".to_string(), "Node.js".to_string()],
                role: CandidateRole::Student,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_chat_falls_back_when_unreachable() {
        let provider = Arc::new(Canned::unreachable());
        let assistant = assistant(provider.clone());

        let outcome = assistant.chat("Find a React dev", &[]).await;

        assert_eq!(outcome.cause(), Some(ErrorKind::Network));
        assert_eq!(outcome.into_value(), CHAT_FALLBACK);
        assert_eq!(provider.calls(), 1);
        let state = assistant.slot(Operation::Chat).state();
        assert_eq!(state.phase, CallPhase::Idle);
        assert_eq!(state.last_result, Some(CallPhase::Failed));
    }

    #[tokio::test]
    async fn test_chat_against_closed_port() {
        let provider = GeminiProvider::builder()
            .api_key("test-key")
            .api_base("http://127.0.0.1:9")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let assistant = Assistant::new(
            RuntimeExecutor::builder(provider).finish(),
            "gemini-1.5-flash",
        );

        let outcome = assistant.chat("Find a React dev", &[]).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value(), CHAT_FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_chat_times_out_to_apology() {
        let provider = Arc::new(Canned::slow("Too late.", Duration::from_secs(60)));
        let assistant = Assistant::new(
            RuntimeExecutor::builder(provider.clone())
                .timeout(Duration::from_secs(1))
                .finish(),
            "gemini-1.5-flash",
        );

        let outcome = assistant.chat("Find a React dev", &[]).await;

        assert_eq!(outcome.cause(), Some(ErrorKind::Timeout));
        assert_eq!(outcome.value(), CHAT_FALLBACK);
        assert_eq!(provider.calls(), 1);
        let state = assistant.slot(Operation::Chat).state();
        assert_eq!(state.phase, CallPhase::Idle);
        assert_eq!(state.last_result, Some(CallPhase::Failed));
    }

    #[tokio::test]
    async fn test_repeated_chat_is_stable() {
        let provider = Arc::new(Canned::replying("Alex knows React."));
        let assistant = assistant(provider.clone());
        let history = vec![ConversationTurn::user("hi"), ConversationTurn::model("Hello!")];

        let first = assistant.chat("Find a React dev", &history).await;
        let second = assistant.chat("Find a React dev", &history).await;

        assert_eq!(first, second);
        assert!(first.is_success());
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].contents, calls[1].contents);
    }

    #[tokio::test]
    async fn test_chat_sends_history_then_user_turn() {
        let provider = Arc::new(Canned::replying("Alex knows React."));
        let assistant = assistant(provider.clone());
        let history = vec![ConversationTurn::user("hi"), ConversationTurn::model("Hello!")];

        let outcome = assistant.chat("Find a React dev", &history).await;

        assert_eq!(outcome, Outcome::Success("Alex knows React.".to_string()));
        let calls = provider.calls.lock().unwrap();
        let req = &calls[0];
        assert_eq!(req.contents.len(), 3);
        assert_eq!(&req.contents[..2], &history[..]);
        assert_eq!(req.contents[2], ConversationTurn::user("Find a React dev"));
        assert!(req
            .system_instruction
            .as_deref()
            .unwrap()
            .starts_with("You are CampusNet AI"));
    }

    #[tokio::test]
    async fn test_chat_empty_reply_gets_apology() {
        let assistant = assistant(Arc::new(Canned::replying("")));
        let outcome = assistant.chat("hello", &[]).await;
        assert_eq!(
            outcome,
            Outcome::Success(campusnet_core::interpret::EMPTY_REPLY.to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_chat_never_reaches_model() {
        let provider = Arc::new(Canned::replying("unused"));
        let assistant = assistant(provider.clone());

        let outcome = assistant.chat("   ", &[]).await;
        assert_eq!(outcome.cause(), Some(ErrorKind::InvalidInput));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_idea_missing_features_is_none() {
        let provider = Arc::new(Canned::replying(
            r#"{"title": "StudySync", "description": "A shared planner."}"#,
        ));
        let assistant = assistant(provider);

        let outcome = assistant
            .generate_project_idea(&["React", "Python"], &["AI"])
            .await;

        assert_eq!(outcome.cause(), Some(ErrorKind::SchemaViolation));
        assert_eq!(outcome.into_value(), None);
    }

    #[tokio::test]
    async fn test_idea_success() {
        let provider = Arc::new(Canned::replying(
            "```json\n{\"title\": \"StudySync\", \"description\": \"A shared planner.\", \"features\": [\"Calendar\", \"Chat\"]}\n```",
        ));
        let assistant = assistant(provider.clone());

        let idea = assistant
            .generate_project_idea(&["React", "Python"], &["AI"])
            .await
            .into_value()
            .unwrap();
        assert_eq!(idea.title, "StudySync");
        assert_eq!(idea.features, vec!["Calendar", "Chat"]);

        let calls = provider.calls.lock().unwrap();
        let text = &calls[0].contents[0].text;
        assert!(text.contains("React, Python"));
        assert!(text.contains("AI"));
    }

    #[tokio::test]
    async fn test_repeated_idea_is_stable() {
        let provider = Arc::new(Canned::replying(
            r#"{"title": "StudySync", "description": "A shared planner.", "features": ["Calendar"]}"#,
        ));
        let assistant = assistant(provider.clone());

        let first = assistant
            .generate_project_idea(&["React", "Python"], &["AI"])
            .await;
        let second = assistant
            .generate_project_idea(&["React", "Python"], &["AI"])
            .await;

        assert_eq!(first, second);
        assert_eq!(first.value().as_ref().unwrap().title, "StudySync");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_team_falls_back_round_robin() {
        let assistant = assistant(Arc::new(Canned::unreachable()));
        let pool = pool(4);

        let outcome = assistant
            .generate_team(
                "campus marketplace app",
                &["Frontend Developer", "Backend Developer"],
                &pool,
            )
            .await;

        assert!(outcome.is_fallback());
        let team = outcome.into_value();
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].candidate, pool[0]);
        assert_eq!(team[1].candidate, pool[1]);
        for member in &team {
            assert!(FALLBACK_COMPATIBILITY.contains(&member.compatibility));
            assert_eq!(member.reason, TEAM_FALLBACK_REASON);
        }
    }

    #[tokio::test]
    async fn test_team_resolves_selections() {
        let provider = Arc::new(Canned::replying(
            r#"[
                {"role": "Frontend Developer", "userId": "3", "reason": "Strong React.", "compatibility": 92.6},
                {"role": "Backend Developer", "userId": "99", "reason": "Knows Node.", "compatibility": 88}
            ]"#,
        ));
        let assistant = assistant(provider.clone());
        let pool = pool(4);

        let outcome = assistant
            .generate_team(
                "campus marketplace app",
                &["Frontend Developer", "Backend Developer"],
                &pool,
            )
            .await;

        assert!(outcome.is_success());
        let team = outcome.into_value();
        assert_eq!(team[0].candidate, pool[2]);
        assert_eq!(team[0].compatibility, 93);
        assert_eq!(team[1].candidate, pool[1]);
        assert_eq!(team[1].reason, "Knows Node.");

        let calls = provider.calls.lock().unwrap();
        let text = &calls[0].contents[0].text;
        assert!(text.contains(r#""id":"3""#));
        assert!(text.contains("Sarah Jones"));
    }

    #[tokio::test]
    async fn test_team_rejects_bad_input_locally() {
        let provider = Arc::new(Canned::replying("[]"));
        let assistant = assistant(provider.clone());

        let outcome = assistant.generate_team("  ", &["Designer"], &pool(2)).await;
        assert_eq!(outcome.cause(), Some(ErrorKind::InvalidInput));
        assert_eq!(outcome.value().len(), 1);

        let outcome = assistant.generate_team("app", &["Designer"], &[]).await;
        assert_eq!(outcome.cause(), Some(ErrorKind::InvalidInput));
        assert!(outcome.value().is_empty());

        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_team_fallback_is_idempotent() {
        let assistant = assistant(Arc::new(Canned::unreachable()));
        let pool = pool(3);
        let roles = ["Frontend Developer", "Backend Developer", "UI/UX Designer", "PM"];

        let first = assistant.generate_team("app", &roles, &pool).await;
        let second = assistant.generate_team("app", &roles, &pool).await;
        assert_eq!(first, second);
        assert_eq!(first.value()[3].candidate, pool[0]);
    }

    #[tokio::test]
    async fn test_repeated_team_selection_is_stable() {
        let provider = Arc::new(Canned::replying(
            r#"[{"role": "Designer", "userId": "2", "reason": "Figma.", "compatibility": 90}]"#,
        ));
        let assistant = assistant(provider);
        let pool = pool(3);

        let first = assistant.generate_team("app", &["Designer"], &pool).await;
        let second = assistant.generate_team("app", &["Designer"], &pool).await;

        assert!(first.is_success());
        assert_eq!(first, second);
        assert_eq!(first.value()[0].candidate, pool[1]);
    }

    #[tokio::test]
    async fn test_repeated_resume_review_is_stable() {
        let provider = Arc::new(Canned::replying(
            r#"{"score": 74.5, "suggestions": ["Quantify impact", "Link your GitHub"]}"#,
        ));
        let assistant = assistant(provider);
        let resume = ResumeContent {
            summary: "CS student who builds web apps.".to_string(),
            ..Default::default()
        };

        let first = assistant.optimize_resume(&resume).await;
        let second = assistant.optimize_resume(&resume).await;

        assert!(first.is_success());
        assert_eq!(first, second);
        assert_eq!(first.value().as_ref().unwrap().score, 74.5);
    }

    #[tokio::test]
    async fn test_resume_passthrough() {
        let provider = Arc::new(Canned::replying(
            r#"{"score": 82, "suggestions": ["Add more keywords"]}"#,
        ));
        let assistant = assistant(provider);
        let resume = ResumeContent {
            summary: "CS student who builds web apps.".to_string(),
            experience: vec![ExperienceEntry {
                company: "Campus IT".to_string(),
                role: "Intern".to_string(),
                period: "2023".to_string(),
                description: "Maintained the help desk portal.".to_string(),
            }],
            projects: Vec::new(),
        };

        let outcome = assistant.optimize_resume(&resume).await;
        assert_eq!(
            outcome,
            Outcome::Success(Some(ResumeOptimization {
                score: 82.0,
                suggestions: vec!["Add more keywords".to_string()],
            }))
        );
    }

    #[tokio::test]
    async fn test_resume_garbage_is_none() {
        let assistant = assistant(Arc::new(Canned::replying("Looks great!")));
        let resume = ResumeContent {
            summary: "Student".to_string(),
            ..Default::default()
        };
        let outcome = assistant.optimize_resume(&resume).await;
        assert_eq!(outcome.cause(), Some(ErrorKind::Parse));
        assert!(outcome.into_value().is_none());
    }

    #[tokio::test]
    async fn test_second_call_while_in_flight_is_busy() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(Canned {
            reply: Ok("Hi there".to_string()),
            gate: Some(gate.clone()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        });
        let assistant = assistant(provider.clone());

        let (first, second) = tokio::join!(assistant.chat("hello", &[]), async {
            let busy = assistant.chat("hello again", &[]).await;
            let other = assistant.optimize_resume(&ResumeContent::default()).await;
            gate.notify_one();
            (busy, other)
        });

        assert_eq!(first, Outcome::Success("Hi there".to_string()));
        let (busy, other) = second;
        assert_eq!(busy.cause(), Some(ErrorKind::Busy));
        assert_eq!(busy.value(), CHAT_FALLBACK);
        // other operations keep their own slot
        assert_eq!(other.cause(), Some(ErrorKind::InvalidInput));
        assert_eq!(provider.calls(), 1);

        let state = assistant.slot(Operation::Chat).state();
        assert_eq!(state.last_result, Some(CallPhase::Success));
        assert_eq!(state.completed, 1);
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = Assistant::from_config(&AssistConfig::default()).unwrap_err();
        assert!(matches!(err, AiError::Configuration(_)));

        let config = AssistConfig::builder()
            .provider(ProviderKind::OpenAi)
            .api_key("sk-test")
            .build();
        let assistant = Assistant::from_config(&config).unwrap();
        assert_eq!(assistant.model(), "gpt-4o-mini");
        assert_eq!(assistant.executor().info().id, "openai");
    }
}
