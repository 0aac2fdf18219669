//! Knowledge document parsing.
//!
//! A document has an optional `keywords` table (topic path -> extra match
//! words) and a `topics` table holding the fact hierarchy. The same serde
//! model is used for TOML and JSON sources.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::{Entry, Fact, PATH_SEPARATOR, Topic};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub topics: BTreeMap<String, RawNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNode {
    Scalar(RawScalar),
    List(Vec<RawScalar>),
    Table(BTreeMap<String, RawNode>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(text) => text,
            RawScalar::Integer(value) => value.to_string(),
            RawScalar::Float(value) => value.to_string(),
            RawScalar::Boolean(value) => value.to_string(),
        }
    }
}

pub fn parse_toml(raw: &str) -> KnowledgeResult<KnowledgeDocument> {
    Ok(toml::from_str(raw)?)
}

pub fn parse_json(raw: &str) -> KnowledgeResult<KnowledgeDocument> {
    Ok(serde_json::from_str(raw)?)
}

/// Convert the raw `topics` table into the root [`Topic`].
pub fn build_root(topics: BTreeMap<String, RawNode>) -> KnowledgeResult<Topic> {
    build_topic(String::new(), topics)
}

/// Normalize keyword lists: trimmed, lower-cased, blanks and duplicates dropped.
pub fn normalize_keywords(
    keywords: BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, Vec<String>> {
    keywords
        .into_iter()
        .map(|(path, words)| {
            let mut words: Vec<String> = words
                .into_iter()
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect();
            words.sort();
            words.dedup();
            (path.trim().to_string(), words)
        })
        .collect()
}

fn build_topic(path: String, table: BTreeMap<String, RawNode>) -> KnowledgeResult<Topic> {
    let mut entries = BTreeMap::new();
    for (key, node) in table {
        validate_key(&path, &key)?;
        let child_path = join_path(&path, &key);
        let entry = match node {
            RawNode::Scalar(scalar) => Entry::Fact(Fact::Text(scalar.into_text())),
            RawNode::List(items) => Entry::Fact(Fact::List(
                items.into_iter().map(RawScalar::into_text).collect(),
            )),
            RawNode::Table(table) => Entry::Topic(build_topic(child_path, table)?),
        };
        entries.insert(key, entry);
    }
    Ok(Topic::new(path, entries))
}

fn validate_key(parent: &str, key: &str) -> KnowledgeResult<()> {
    if key.trim().is_empty() {
        return Err(KnowledgeError::InvalidDocument(format!(
            "empty key under '{}'",
            display_path(parent)
        )));
    }
    if key.contains(PATH_SEPARATOR) {
        return Err(KnowledgeError::InvalidDocument(format!(
            "key '{}' under '{}' contains '{}'",
            key,
            display_path(parent),
            PATH_SEPARATOR
        )));
    }
    Ok(())
}

pub(crate) fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, key)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}
