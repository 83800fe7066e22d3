//! Knowledge suggestions for the chat input.
//!
//! Typing feeds [`DebouncedSearch`], which runs the query against a
//! [`KnowledgeSearch`] backend after a quiet period and reports a
//! [`SearchUpdate`]. [`SuggestionList`] shows only the newest request's
//! results.

mod debounce;
mod fallback;
mod index;

use async_trait::async_trait;
use thiserror::Error;

pub use debounce::DebouncedSearch;
pub use fallback::KeywordFallback;
pub use index::{KnowledgeEntry, LocalKnowledgeIndex};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Knowledge search unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// A knowledge entry offered under the chat input
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub score: f32,
}

/// Where a batch of suggestions came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    Index,
    /// Static keyword list used when the backend failed
    Fallback,
}

#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SearchError>;
}

/// Results of one debounced request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchUpdate {
    pub seq: u64,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub source: SuggestionSource,
}

/// Suggestions currently shown, tagged with the request they answer
#[derive(Debug, Default)]
pub struct SuggestionList {
    latest_seq: u64,
    shown_seq: u64,
    query: String,
    items: Vec<Suggestion>,
    source: Option<SuggestionSource>,
    selected: usize,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request. An empty query clears the list right away.
    pub fn track(&mut self, seq: u64, query: &str) {
        self.latest_seq = self.latest_seq.max(seq);
        if query.trim().is_empty() {
            self.clear();
        }
    }

    /// Apply an update unless a newer request has been made since.
    /// Returns true if the update was shown.
    pub fn apply(&mut self, update: SearchUpdate) -> bool {
        if update.seq < self.latest_seq {
            tracing::trace!(
                seq = update.seq,
                latest = self.latest_seq,
                "Dropping stale search results"
            );
            return false;
        }

        self.latest_seq = update.seq;
        self.shown_seq = update.seq;
        self.query = update.query;
        self.items = update.suggestions;
        self.source = Some(update.source);
        self.selected = 0;
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.query.clear();
        self.source = None;
        self.selected = 0;
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn source(&self) -> Option<SuggestionSource> {
        self.source
    }

    /// Sequence number of the request whose results are shown
    pub fn shown_seq(&self) -> u64 {
        self.shown_seq
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }
}
