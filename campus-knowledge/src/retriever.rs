//! Query term extraction and fragment retrieval.
//!
//! A question is lower-cased, split on anything that is not alphanumeric,
//! and filtered against a stop-word list. Terms from the most recent user
//! turns are added so follow-up questions ("what about graduate?") keep the
//! topic of the conversation.

use std::collections::BTreeSet;
use std::sync::Arc;

use campus_core::{ConversationTurn, RetrievalSettings, TurnRole};

use crate::models::Fragment;
use crate::storage::KnowledgeStore;

/// Words that never carry topic information on their own.
const STOP_WORDS: &[&str] = &[
    "a", "about", "am", "an", "and", "any", "are", "as", "at", "available", "be", "by", "can",
    "could", "do", "does", "for", "from", "get", "has", "have", "hello", "hey", "hi", "how", "i",
    "in", "is", "it", "know", "like", "many", "me", "much", "my", "need", "of", "on", "or", "our",
    "please", "should", "some", "tell", "thank", "thanks", "that", "the", "there", "this", "to",
    "want", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "would", "you", "your",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Lower-case `text` and replace every non-alphanumeric character with a space.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<String>()
            } else {
                " ".to_string()
            }
        })
        .collect()
}

/// Distinct search terms of `text`, skipping stop words and short tokens.
pub fn extract_terms(text: &str, min_len: usize) -> BTreeSet<String> {
    normalize(text)
        .split_whitespace()
        .filter(|word| word.chars().count() >= min_len)
        .filter(|word| !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

/// Selects knowledge fragments relevant to a question.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: Arc<KnowledgeStore>,
    settings: RetrievalSettings,
}

impl Retriever {
    pub fn new(store: Arc<KnowledgeStore>, settings: RetrievalSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Terms from the question plus the last few user turns of `history`.
    pub fn query_terms(&self, question: &str, history: &[ConversationTurn]) -> BTreeSet<String> {
        let min_len = self.settings.min_term_len;
        let mut terms = extract_terms(question, min_len);

        let recent_user_turns = history
            .iter()
            .rev()
            .filter(|turn| turn.role == TurnRole::User && turn.has_content())
            .take(self.settings.effective_history_user_turns());
        for turn in recent_user_turns {
            terms.extend(extract_terms(&turn.content, min_len));
        }

        terms
    }

    /// Up to `max_fragments` fragments, best match first.
    ///
    /// Identical inputs always produce identical output.
    pub fn retrieve(&self, question: &str, history: &[ConversationTurn]) -> Vec<Fragment> {
        let terms = self.query_terms(question, history);
        let mut fragments = self.store.search(&terms);
        fragments.truncate(self.settings.effective_max_fragments());

        tracing::debug!(
            terms = ?terms,
            fragments = fragments.len(),
            "retrieved knowledge fragments"
        );

        fragments
    }
}
