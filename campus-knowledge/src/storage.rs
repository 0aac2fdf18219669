use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::{Entry, Fact, Fragment, Lookup, PATH_SEPARATOR, Topic, render_fact_line};
use crate::parser::{self, KnowledgeDocument, join_path};

/// Knowledge base compiled into the binary.
const BUILTIN_KNOWLEDGE: &str = include_str!("../knowledge/cuny.toml");

/// Keyword words shorter than this never match inside a longer query term.
const MIN_STEM_LEN: usize = 3;

/// Read-only knowledge hierarchy with a flat leaf index for search.
///
/// Once constructed nothing can mutate it, so a single instance can be
/// shared across request handlers behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    root: Topic,
    leaves: Vec<IndexedLeaf>,
}

#[derive(Debug, Clone)]
struct IndexedLeaf {
    path: String,
    text: String,
    /// Lower-cased key words, path words, inherited keywords and fact text.
    haystack: String,
    /// Keyword words that also match when they occur inside a query term,
    /// so "costs" still hits a topic keyed on "cost".
    stems: Vec<String>,
}

impl IndexedLeaf {
    fn matches(&self, term: &str) -> bool {
        self.haystack.contains(term) || self.stems.iter().any(|stem| term.contains(stem.as_str()))
    }
}

impl KnowledgeStore {
    /// Build a store from a parsed document, validating keys and keyword paths.
    pub fn from_document(document: KnowledgeDocument) -> KnowledgeResult<Self> {
        let root = parser::build_root(document.topics)?;
        let keywords = parser::normalize_keywords(document.keywords);

        for path in keywords.keys() {
            if !lookup_in(&root, path).is_found() {
                return Err(KnowledgeError::InvalidDocument(format!(
                    "keywords reference unknown path '{}'",
                    path
                )));
            }
        }

        let mut leaves = Vec::new();
        index_topic(&root, &keywords, &[], &mut leaves);
        leaves.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            categories = root.len(),
            leaves = leaves.len(),
            "knowledge store loaded"
        );

        Ok(Self { root, leaves })
    }

    pub fn from_toml_str(raw: &str) -> KnowledgeResult<Self> {
        Self::from_document(parser::parse_toml(raw)?)
    }

    pub fn from_json_str(raw: &str) -> KnowledgeResult<Self> {
        Self::from_document(parser::parse_json(raw)?)
    }

    /// Load a document from disk; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> KnowledgeResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_toml_str(&raw)
        }
    }

    /// The bundled CUNY knowledge base.
    pub fn builtin() -> KnowledgeResult<Self> {
        Self::from_toml_str(BUILTIN_KNOWLEDGE)
    }

    pub fn root(&self) -> &Topic {
        &self.root
    }

    /// Top-level topic keys, in key order.
    pub fn categories(&self) -> Vec<&str> {
        self.root
            .entries()
            .filter(|(_, entry)| entry.as_topic().is_some())
            .map(|(key, _)| key)
            .collect()
    }

    /// Number of indexed leaf facts.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Resolve a dotted path to a topic or fact.
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        lookup_in(&self.root, path)
    }

    /// Like [`lookup`](Self::lookup) but a miss is a [`KnowledgeError::NotFound`].
    pub fn require(&self, path: &str) -> KnowledgeResult<&Entry> {
        self.lookup(path)
            .found()
            .ok_or_else(|| KnowledgeError::NotFound(path.to_string()))
    }

    /// Resolve a dotted path that must name a topic.
    pub fn topic(&self, path: &str) -> KnowledgeResult<&Topic> {
        self.require(path)?
            .as_topic()
            .ok_or_else(|| KnowledgeError::NotFound(path.to_string()))
    }

    /// Score every leaf against `terms` (case-insensitive substring match).
    ///
    /// A term matches when it occurs in the leaf's indexed text, or when one
    /// of the leaf's keywords occurs inside the term.
    ///
    /// Fragments are ordered by matched-term count descending, then by path.
    /// Leaves matching no term are left out; an empty term set matches nothing.
    pub fn search(&self, terms: &BTreeSet<String>) -> Vec<Fragment> {
        let terms: Vec<String> = terms
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut fragments: Vec<Fragment> = self
            .leaves
            .iter()
            .filter_map(|leaf| {
                let score = terms
                    .iter()
                    .filter(|term| leaf.matches(term))
                    .count() as u32;
                (score > 0).then(|| Fragment {
                    path: leaf.path.clone(),
                    text: leaf.text.clone(),
                    score,
                })
            })
            .collect();

        fragments.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
        fragments
    }
}

fn lookup_in<'a>(root: &'a Topic, path: &str) -> Lookup<'a> {
    let mut segments = path.split(PATH_SEPARATOR);
    let Some(first) = segments.next() else {
        return Lookup::NotFound;
    };
    let Some(mut entry) = root.get(first) else {
        return Lookup::NotFound;
    };

    for segment in segments {
        let next = entry.as_topic().and_then(|topic| topic.get(segment));
        match next {
            Some(found) => entry = found,
            None => return Lookup::NotFound,
        }
    }

    Lookup::Found(entry)
}

fn index_topic<'a>(
    topic: &'a Topic,
    keywords: &'a BTreeMap<String, Vec<String>>,
    inherited: &[&'a str],
    out: &mut Vec<IndexedLeaf>,
) {
    let mut scope: Vec<&'a str> = inherited.to_vec();
    if let Some(words) = keywords.get(topic.path()) {
        scope.extend(words.iter().map(String::as_str));
    }

    for (key, entry) in topic.entries() {
        let path = join_path(topic.path(), key);
        match entry {
            Entry::Topic(child) => index_topic(child, keywords, &scope, out),
            Entry::Fact(fact) => {
                let mut leaf_scope = scope.clone();
                if let Some(words) = keywords.get(&path) {
                    leaf_scope.extend(words.iter().map(String::as_str));
                }
                out.push(index_leaf(path, fact, &leaf_scope));
            }
        }
    }
}

fn index_leaf(path: String, fact: &Fact, keywords: &[&str]) -> IndexedLeaf {
    let path_words = path.replace(['_', PATH_SEPARATOR], " ");
    let haystack = format!("{} {} {}", path_words, keywords.join(" "), fact.render()).to_lowercase();
    let text = render_fact_line(&path, fact);

    let mut stems: Vec<String> = keywords
        .iter()
        .flat_map(|keyword| keyword.split_whitespace())
        .filter(|word| word.chars().count() >= MIN_STEM_LEN)
        .map(str::to_lowercase)
        .collect();
    stems.sort();
    stems.dedup();

    IndexedLeaf {
        path,
        text,
        haystack,
        stems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[keywords]
tuition_fees = ["tuition", "cost"]
"admissions.application_fee" = ["apply"]

[topics.admissions]
application_fee = "$65"

[topics.admissions.deadlines]
fall = "February 1st"
spring = "September 15th"

[topics.tuition_fees.undergraduate]
ny_resident = "$3,465 per semester"
"#;

    fn terms(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_lookup_found_and_not_found() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();

        let deadlines = store.lookup("admissions.deadlines").found().unwrap();
        assert_eq!(deadlines.as_topic().unwrap().len(), 2);

        let fee = store.lookup("admissions.application_fee").found().unwrap();
        assert_eq!(fee.as_fact(), Some(&Fact::Text("$65".to_string())));

        assert_eq!(store.lookup("admissions.housing"), Lookup::NotFound);
        assert_eq!(store.lookup("admissions.application_fee.extra"), Lookup::NotFound);
        assert_eq!(store.lookup(""), Lookup::NotFound);
        assert_eq!(store.lookup("admissions..deadlines"), Lookup::NotFound);
    }

    #[test]
    fn test_require_reports_not_found() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        let err = store.require("campus_life").unwrap_err();
        assert!(matches!(err, KnowledgeError::NotFound(path) if path == "campus_life"));

        assert!(store.topic("admissions").is_ok());
        assert!(matches!(
            store.topic("admissions.application_fee"),
            Err(KnowledgeError::NotFound(_))
        ));
    }

    #[test]
    fn test_categories_and_leaf_count() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        assert_eq!(store.categories(), vec!["admissions", "tuition_fees"]);
        assert_eq!(store.leaf_count(), 4);
    }

    #[test]
    fn test_search_scores_by_distinct_terms() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        let fragments = store.search(&terms(&["application", "fee"]));

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].path, "admissions.application_fee");
        assert_eq!(fragments[0].score, 2);
        assert_eq!(fragments[0].text, "Admissions > Application Fee: $65");
        // "fee" also appears in the `tuition_fees` path words
        assert_eq!(fragments[1].path, "tuition_fees.undergraduate.ny_resident");
        assert_eq!(fragments[1].score, 1);
    }

    #[test]
    fn test_search_uses_inherited_and_leaf_keywords() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();

        let cost = store.search(&terms(&["cost"]));
        assert_eq!(cost.len(), 1);
        assert_eq!(cost[0].path, "tuition_fees.undergraduate.ny_resident");

        let apply = store.search(&terms(&["apply"]));
        assert_eq!(apply.len(), 1);
        assert_eq!(apply[0].path, "admissions.application_fee");
    }

    #[test]
    fn test_search_matches_keywords_inside_longer_terms() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();

        let costs = store.search(&terms(&["costs"]));
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].path, "tuition_fees.undergraduate.ny_resident");
        assert_eq!(costs[0].score, 1);

        // keyword words, not path words or fact text, match inside a term
        assert!(store.search(&terms(&["feeling"])).is_empty());
        assert!(store.search(&terms(&["sixty-five"])).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        let fragments = store.search(&terms(&["FEBRUARY"]));
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].path, "admissions.deadlines.fall");
    }

    #[test]
    fn test_search_ties_break_on_path() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        let fragments = store.search(&terms(&["deadlines"]));
        let paths: Vec<&str> = fragments.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["admissions.deadlines.fall", "admissions.deadlines.spring"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let store = KnowledgeStore::from_toml_str(SAMPLE).unwrap();
        assert!(store.search(&terms(&["quidditch"])).is_empty());
        assert!(store.search(&BTreeSet::new()).is_empty());
        assert!(store.search(&terms(&["   "])).is_empty());
    }

    #[test]
    fn test_unknown_keyword_path_is_rejected() {
        let raw = r#"
[keywords]
housing = ["dorm"]

[topics.admissions]
application_fee = "$65"
"#;
        let err = KnowledgeStore::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidDocument(_)));
    }

    #[test]
    fn test_load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("kb.json");
        std::fs::write(&json_path, r#"{"topics": {"admissions": {"application_fee": "$65"}}}"#)
            .unwrap();
        let store = KnowledgeStore::load(&json_path).unwrap();
        assert!(store.lookup("admissions.application_fee").is_found());

        let toml_path = dir.path().join("kb.toml");
        std::fs::write(&toml_path, SAMPLE).unwrap();
        let store = KnowledgeStore::load(&toml_path).unwrap();
        assert_eq!(store.leaf_count(), 4);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            KnowledgeStore::load(&missing),
            Err(KnowledgeError::Io(_))
        ));
    }

    #[test]
    fn test_builtin_store_loads() {
        let store = KnowledgeStore::builtin().unwrap();
        assert_eq!(
            store.categories(),
            vec![
                "academics",
                "admissions",
                "campus_life",
                "campus_tours",
                "scholarships",
                "student_services",
                "technology",
                "transportation",
                "tuition_fees",
            ]
        );
        let fee = store.require("admissions.application_fee").unwrap();
        assert_eq!(fee.as_fact().unwrap().render(), "$65 for most colleges");
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KnowledgeStore>();
    }
}
