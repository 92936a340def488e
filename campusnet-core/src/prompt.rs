//! Prompt assembly.

use crate::error::AiError;
use crate::schema::SchemaDescriptor;
use crate::types::ConversationTurn;

/// An assembled prompt, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    system_instruction: Option<String>,
    history: Vec<ConversationTurn>,
    user_text: String,
    response_schema: Option<SchemaDescriptor>,
}

impl PromptRequest {
    /// Start building a prompt around the new user input
    pub fn builder(user_text: impl Into<String>) -> PromptBuilder {
        PromptBuilder::new(user_text)
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn response_schema(&self) -> Option<&SchemaDescriptor> {
        self.response_schema.as_ref()
    }

    /// Ordered turns to send: the history followed by the new user turn.
    pub fn turns(&self) -> Vec<ConversationTurn> {
        let mut turns = Vec::with_capacity(self.history.len() + 1);
        turns.extend(self.history.iter().cloned());
        turns.push(ConversationTurn::user(self.user_text.clone()));
        turns
    }
}

/// Builder for [`PromptRequest`].
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_instruction: Option<String>,
    history: Vec<ConversationTurn>,
    user_text: String,
    response_schema: Option<SchemaDescriptor>,
}

impl PromptBuilder {
    /// Create a builder for the given user input
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            history: Vec::new(),
            user_text: user_text.into(),
            response_schema: None,
        }
    }

    /// Set the out-of-band system instruction; blank instructions are dropped
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.system_instruction = if instruction.trim().is_empty() {
            None
        } else {
            Some(instruction)
        };
        self
    }

    /// Set the prior conversation, oldest turn first
    pub fn history(mut self, history: impl IntoIterator<Item = ConversationTurn>) -> Self {
        self.history = history.into_iter().collect();
        self
    }

    /// Request structured output of the given shape
    pub fn response_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Finish the prompt; fails on empty or whitespace-only user text
    pub fn build(self) -> Result<PromptRequest, AiError> {
        if self.user_text.trim().is_empty() {
            return Err(AiError::invalid_input("prompt text must not be empty"));
        }

        Ok(PromptRequest {
            system_instruction: self.system_instruction,
            history: self.history,
            user_text: self.user_text,
            response_schema: self.response_schema,
        })
    }
}
