//! Base system prompt definitions.
//!
//! This module loads prompt content from `campus-gateway/prompts/`.

use campus_knowledge::Fragment;

use crate::content::{self, ContentError, ids};

/// Heading placed before the retrieved knowledge in the system message.
pub const KNOWLEDGE_CONTEXT_HEADER: &str = "Relevant information from the knowledge base:";

/// Context used when retrieval found nothing.
pub const NO_KNOWLEDGE_CONTEXT: &str = "No specific information found in the knowledge base.";

/// The assistant instructions for `institution`.
///
/// content: prompts/system-base.md
pub fn base_system_prompt(institution: &str) -> Result<String, ContentError> {
    content::prompt_text(ids::PROMPT_SYSTEM_BASE, &[("institution", institution)])
}

/// Knowledge section of the system message; fragment texts are kept verbatim.
pub fn knowledge_context(fragments: &[Fragment]) -> String {
    let body = if fragments.is_empty() {
        NO_KNOWLEDGE_CONTEXT.to_string()
    } else {
        fragments
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{}\n{}", KNOWLEDGE_CONTEXT_HEADER, body)
}
