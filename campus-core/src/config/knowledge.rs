//! Knowledge and retrieval configuration types.
//!
//! These are consumed by `campus-knowledge`; they live here so that the
//! settings file can be parsed without depending on the knowledge crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the knowledge base document comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeSettings {
    /// Optional TOML or JSON knowledge document. The bundled knowledge base
    /// is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Retrieval tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Hard cap on fragments passed downstream per request.
    #[serde(default = "default_max_fragments")]
    pub max_fragments: usize,
    /// How many of the most recent prior user turns contribute search terms (0-2).
    #[serde(default = "default_history_user_turns")]
    pub history_user_turns: usize,
    /// Terms shorter than this (in chars) are ignored.
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_fragments: default_max_fragments(),
            history_user_turns: default_history_user_turns(),
            min_term_len: default_min_term_len(),
        }
    }
}

impl RetrievalSettings {
    /// Cap actually enforced; a configured zero still lets one fragment through.
    pub fn effective_max_fragments(&self) -> usize {
        self.max_fragments.max(1)
    }

    /// Number of prior user turns mined for terms, clamped to 0..=2.
    pub fn effective_history_user_turns(&self) -> usize {
        self.history_user_turns.min(2)
    }
}

fn default_max_fragments() -> usize {
    5
}

fn default_history_user_turns() -> usize {
    2
}

fn default_min_term_len() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_defaults() {
        let settings = RetrievalSettings::default();
        assert_eq!(settings.max_fragments, 5);
        assert_eq!(settings.history_user_turns, 2);
        assert_eq!(settings.min_term_len, 3);
    }

    #[test]
    fn test_effective_values_are_clamped() {
        let settings = RetrievalSettings {
            max_fragments: 0,
            history_user_turns: 9,
            min_term_len: 1,
        };
        assert_eq!(settings.effective_max_fragments(), 1);
        assert_eq!(settings.effective_history_user_turns(), 2);
    }
}
