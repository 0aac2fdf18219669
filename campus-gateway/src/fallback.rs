//! Template answers built straight from retrieved fragments.

use campus_knowledge::Fragment;

use crate::deterministic_messages::{ADVISOR_FALLBACK, FALLBACK_CLOSING, FALLBACK_INTRO};

/// Answers without the model. Never fails and never returns an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnswerer;

impl FallbackAnswerer {
    pub fn new() -> Self {
        Self
    }

    /// List the fragment texts in received order, or point to a human advisor.
    pub fn answer(&self, question: &str, fragments: &[Fragment]) -> String {
        tracing::debug!(
            question_chars = question.chars().count(),
            fragments = fragments.len(),
            "answering from knowledge base"
        );

        if fragments.is_empty() {
            return ADVISOR_FALLBACK.to_string();
        }

        let bullets = fragments
            .iter()
            .map(|fragment| format!("- {}", fragment.text))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{FALLBACK_INTRO}\n\n{bullets}\n\n{FALLBACK_CLOSING}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(path: &str, text: &str) -> Fragment {
        Fragment {
            path: path.to_string(),
            text: text.to_string(),
            score: 1,
        }
    }

    #[test]
    fn test_no_fragments_gives_advisor_message() {
        let answer = FallbackAnswerer::new().answer("Do you have a quidditch team?", &[]);
        assert_eq!(answer, ADVISOR_FALLBACK);
    }

    #[test]
    fn test_fragments_are_listed_in_order() {
        let fragments = vec![
            fragment("admissions.application_fee", "Admissions > Application Fee: $65"),
            fragment("admissions.deadlines.fall", "Admissions > Deadlines > Fall: February 1st"),
        ];
        let answer = FallbackAnswerer::new().answer("What is the application fee?", &fragments);

        assert_eq!(
            answer,
            "Here's what I found in our admissions information:\n\n\
             - Admissions > Application Fee: $65\n\
             - Admissions > Deadlines > Fall: February 1st\n\n\
             For the most current details, please contact the admissions office directly."
        );
    }

    #[test]
    fn test_answer_is_never_empty() {
        let answerer = FallbackAnswerer::new();
        assert!(!answerer.answer("", &[]).is_empty());
        assert!(!answerer.answer("", &[fragment("a", "")]).is_empty());
    }
}
