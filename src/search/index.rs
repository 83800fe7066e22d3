use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{KnowledgeSearch, SearchError, Suggestion};
use crate::util::tokenize;

/// Query length past which a search is rejected
const MAX_QUERY_LEN: usize = 512;

/// A document in the local knowledge index
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub body: String,
    title_terms: HashSet<String>,
    body_terms: HashSet<String>,
}

impl KnowledgeEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let body = body.into();
        Self {
            id: id.into(),
            title_terms: tokenize(&title).into_iter().collect(),
            body_terms: tokenize(&body).into_iter().collect(),
            title,
            body,
        }
    }

    /// Title hits count double
    fn score(&self, terms: &[String]) -> f32 {
        let hits: usize = terms
            .iter()
            .map(|t| {
                2 * usize::from(self.title_terms.contains(t))
                    + usize::from(self.body_terms.contains(t))
            })
            .sum();
        hits as f32 / (terms.len() * 3) as f32
    }

    fn snippet(&self) -> String {
        self.body.lines().next().unwrap_or_default().to_string()
    }
}

/// In-process term-overlap index over knowledge entries
#[derive(Debug, Default)]
pub struct LocalKnowledgeIndex {
    entries: RwLock<Vec<KnowledgeEntry>>,
}

impl LocalKnowledgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let index = Self::new();
        for (id, title, body) in [
            (
                "getting-started",
                "Getting started with aiMate",
                "Open settings with F2 to pick a model and write a system prompt.",
            ),
            (
                "projects",
                "Projects",
                "Projects group conversations and knowledge. Create one with Ctrl+N.",
            ),
            (
                "model-params",
                "Model parameters",
                "Temperature controls randomness; max tokens caps the reply length.",
            ),
            (
                "tools",
                "Tools",
                "Enable web search, the code interpreter or knowledge lookup per chat.",
            ),
            (
                "debug-console",
                "Debug console",
                "F12 shows recent UI events when debug logging is enabled.",
            ),
            (
                "rust-ownership",
                "Rust ownership",
                "Every value has one owner; borrowing lends access without moving it.",
            ),
        ] {
            index.insert(KnowledgeEntry::new(id, title, body));
        }
        index
    }

    /// Add or replace an entry by id
    pub fn insert(&self, entry: KnowledgeEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn rank(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SearchError> {
        if query.len() > MAX_QUERY_LEN {
            return Err(SearchError::InvalidQuery(format!(
                "query longer than {MAX_QUERY_LEN} bytes"
            )));
        }

        let terms = tokenize(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.entries.read();
        let mut ranked: Vec<Suggestion> = entries
            .iter()
            .filter_map(|entry| {
                let score = entry.score(&terms);
                (score > 0.0).then(|| Suggestion {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    snippet: entry.snippet(),
                    score,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.title.cmp(&b.title)));
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[async_trait]
impl KnowledgeSearch for LocalKnowledgeIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SearchError> {
        self.rank(query, limit)
    }
}
