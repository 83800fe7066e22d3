//! Debounced search feeding the suggestion list

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aimate::search::{
    DebouncedSearch, KeywordFallback, KnowledgeSearch, LocalKnowledgeIndex, SearchError,
    SearchUpdate, Suggestion, SuggestionList, SuggestionSource,
};
use async_trait::async_trait;
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Backend that takes a while to answer
struct SlowSearch {
    delay: Duration,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl SlowSearch {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl KnowledgeSearch for SlowSearch {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<Suggestion>, SearchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Suggestion {
            id: query.to_string(),
            title: format!("Result for {query}"),
            snippet: String::new(),
            score: 1.0,
        }])
    }
}

struct OfflineSearch;

#[async_trait]
impl KnowledgeSearch for OfflineSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Suggestion>, SearchError> {
        Err(SearchError::Unavailable("connection refused".to_string()))
    }
}

fn submit(search: &mut DebouncedSearch, list: &mut SuggestionList, query: &str) -> u64 {
    let seq = search.submit(query);
    list.track(seq, query);
    seq
}

#[tokio::test(start_paused = true)]
async fn test_builtin_index_ranks_matching_entry_first() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = DebouncedSearch::new(Arc::new(LocalKnowledgeIndex::builtin()), tx, DEBOUNCE, 5);
    let mut list = SuggestionList::new();

    submit(&mut search, &mut list, "tools");
    let update = rx.recv().await.unwrap();
    assert!(list.apply(update));

    assert_eq!(list.query(), "tools");
    assert_eq!(list.source(), Some(SuggestionSource::Index));
    assert_eq!(list.items()[0].id, "tools");
}

#[tokio::test(start_paused = true)]
async fn test_request_superseded_mid_search_never_shows() {
    let backend = Arc::new(SlowSearch::new(Duration::from_secs(1)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = DebouncedSearch::new(backend.clone(), tx, DEBOUNCE, 5);
    let mut list = SuggestionList::new();

    submit(&mut search, &mut list, "ownership");
    // Past the debounce, so the first search is running
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(100)).await;
    assert_eq!(backend.started.load(Ordering::SeqCst), 1);

    let latest = submit(&mut search, &mut list, "borrowing");
    let update = rx.recv().await.unwrap();
    assert_eq!(update.seq, latest);
    assert!(list.apply(update));
    assert_eq!(list.items()[0].title, "Result for borrowing");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(backend.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_late_update_for_older_request_is_dropped() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = DebouncedSearch::new(Arc::new(LocalKnowledgeIndex::builtin()), tx, DEBOUNCE, 5);
    let mut list = SuggestionList::new();

    let first = submit(&mut search, &mut list, "projects");
    let second = submit(&mut search, &mut list, "debug");
    let update = rx.recv().await.unwrap();
    assert_eq!(update.seq, second);
    assert!(list.apply(update));

    // An answer to the first request arriving now must not replace the list
    let stale = SearchUpdate {
        seq: first,
        query: "projects".to_string(),
        suggestions: Vec::new(),
        source: SuggestionSource::Index,
    };
    assert!(!list.apply(stale));
    assert_eq!(list.query(), "debug");
    assert_eq!(list.shown_seq(), second);
}

#[tokio::test(start_paused = true)]
async fn test_offline_backend_uses_keyword_fallback() {
    let mut fallback = KeywordFallback::new();
    fallback.add(&["deploy"], "deploying", "Deploying aiMate", "Run it behind a proxy.");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search =
        DebouncedSearch::new(Arc::new(OfflineSearch), tx, DEBOUNCE, 5).with_fallback(fallback);
    let mut list = SuggestionList::new();

    submit(&mut search, &mut list, "deploy");
    assert!(list.apply(rx.recv().await.unwrap()));

    assert_eq!(list.source(), Some(SuggestionSource::Fallback));
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].id, "deploying");
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_hides_results_and_cancels() {
    let backend = Arc::new(SlowSearch::new(Duration::from_millis(10)));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = DebouncedSearch::new(backend.clone(), tx, DEBOUNCE, 5);
    let mut list = SuggestionList::new();

    submit(&mut search, &mut list, "model");
    assert!(list.apply(rx.recv().await.unwrap()));
    assert!(!list.is_empty());

    submit(&mut search, &mut list, "model params");
    submit(&mut search, &mut list, "");
    assert!(list.is_empty());
    assert!(!search.is_pending());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(backend.started.load(Ordering::SeqCst), 1);
}
