//! Prompt assembly for the admissions assistant.
//!
//! A prompt is provider-neutral: a system message carrying the assistant
//! instructions and the retrieved knowledge, a window of prior turns, and the
//! current question. Providers convert it to their wire format.

pub mod base;
pub mod builder;

use serde::Serialize;

pub use base::{KNOWLEDGE_CONTEXT_HEADER, NO_KNOWLEDGE_CONTEXT, base_system_prompt, knowledge_context};
pub use builder::PromptBuilder;

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl PromptRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptRole::System => "system",
            PromptRole::User => "user",
            PromptRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(PromptRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(PromptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(PromptRole::Assistant, content)
    }
}

/// Ordered messages sent to the model.
///
/// Built by [`PromptBuilder`]: exactly one leading system message and a
/// trailing user message holding the question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub messages: Vec<PromptMessage>,
}

impl Prompt {
    /// Content of the leading system message.
    pub fn system(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == PromptRole::System)
            .map(|m| m.content.as_str())
    }

    /// Content of the trailing user message.
    pub fn question(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str())
    }

    /// Messages between the system message and the question.
    pub fn history(&self) -> &[PromptMessage] {
        match self.messages.len() {
            0..=2 => &[],
            len => &self.messages[1..len - 1],
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
