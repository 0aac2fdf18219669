use std::collections::BTreeMap;

use serde::Serialize;

/// Separator between segments of a topic path (`admissions.deadlines`).
pub const PATH_SEPARATOR: char = '.';

/// A node of the knowledge hierarchy.
///
/// Topics are built once when the store loads and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    path: String,
    entries: BTreeMap<String, Entry>,
}

/// Value stored under a key of a [`Topic`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Fact(Fact),
    Topic(Topic),
}

/// A leaf value of the knowledge hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Fact {
    Text(String),
    List(Vec<String>),
}

/// Result of an explicit path lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Entry),
    NotFound,
}

/// A scored slice of knowledge text produced by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Dotted path of the fact the text was rendered from
    pub path: String,
    /// Human-readable rendering, inserted verbatim into prompts and fallbacks
    pub text: String,
    /// Number of distinct query terms that matched
    pub score: u32,
}

impl Topic {
    pub(crate) fn new(path: impl Into<String>, entries: BTreeMap<String, Entry>) -> Self {
        Self {
            path: path.into(),
            entries,
        }
    }

    /// Dotted path of this topic; empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment; empty for the root.
    pub fn key(&self) -> &str {
        self.path
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Child topics in key order.
    pub fn subtopics(&self) -> impl Iterator<Item = &Topic> {
        self.entries.values().filter_map(|entry| match entry {
            Entry::Topic(topic) => Some(topic),
            Entry::Fact(_) => None,
        })
    }

    /// Facts stored directly on this topic, in key order.
    pub fn facts(&self) -> impl Iterator<Item = (&str, &Fact)> {
        self.entries.iter().filter_map(|(key, entry)| match entry {
            Entry::Fact(fact) => Some((key.as_str(), fact)),
            Entry::Topic(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable title, e.g. `tuition_fees` -> `Tuition Fees`.
    pub fn title(&self) -> String {
        humanize_key(self.key())
    }
}

impl Entry {
    pub fn as_topic(&self) -> Option<&Topic> {
        match self {
            Entry::Topic(topic) => Some(topic),
            Entry::Fact(_) => None,
        }
    }

    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Entry::Fact(fact) => Some(fact),
            Entry::Topic(_) => None,
        }
    }
}

impl Fact {
    /// Value as plain text; list items are comma separated.
    pub fn render(&self) -> String {
        match self {
            Fact::Text(text) => text.clone(),
            Fact::List(items) => items.join(", "),
        }
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Entry> {
        match self {
            Lookup::Found(entry) => Some(entry),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Turn a snake_case key into title case words.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a leaf for prompts: `Admissions > Application Fee: $65 for most colleges`.
pub fn render_fact_line(path: &str, fact: &Fact) -> String {
    let heading = path
        .split(PATH_SEPARATOR)
        .map(humanize_key)
        .collect::<Vec<_>>()
        .join(" > ");
    format!("{}: {}", heading, fact.render())
}
