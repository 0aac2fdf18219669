use campus_core::{ConversationTurn, PromptSettings};
use campus_knowledge::Fragment;

use crate::chat::build_history_messages;
use crate::content::ContentError;
use crate::prompt::{Prompt, PromptMessage, base};

/// Assembles the grounded prompt for one question.
///
/// The instructions are rendered once at construction; [`build`](Self::build)
/// does no I/O and cannot fail.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instructions: String,
    history_window: usize,
}

impl PromptBuilder {
    pub fn new(settings: &PromptSettings) -> Result<Self, ContentError> {
        let instructions = base::base_system_prompt(&settings.institution)?;
        Ok(Self::with_instructions(instructions, settings.history_window))
    }

    /// Use fixed instructions instead of the bundled template.
    pub fn with_instructions(instructions: impl Into<String>, history_window: usize) -> Self {
        Self {
            instructions: instructions.into(),
            history_window,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// System message, the recent history window, then the question.
    pub fn build(
        &self,
        question: &str,
        fragments: &[Fragment],
        history: &[ConversationTurn],
    ) -> Prompt {
        let system = format!(
            "{}\n\n{}",
            self.instructions,
            base::knowledge_context(fragments)
        );

        let mut messages = Vec::with_capacity(self.history_window + 2);
        messages.push(PromptMessage::system(system));
        messages.extend(build_history_messages(history, self.history_window));
        messages.push(PromptMessage::user(question));

        Prompt { messages }
    }
}
