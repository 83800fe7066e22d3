use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{KeywordFallback, KnowledgeSearch, SearchUpdate, SuggestionSource};

/// Debounced knowledge search.
///
/// Every [`submit`](Self::submit) gets the next sequence number and cancels
/// whatever request was still pending, so at most one search is in flight
/// and results always carry the request they answer.
pub struct DebouncedSearch {
    backend: Arc<dyn KnowledgeSearch>,
    fallback: Arc<KeywordFallback>,
    tx: mpsc::UnboundedSender<SearchUpdate>,
    debounce: Duration,
    limit: usize,
    seq: u64,
    pending: Option<CancellationToken>,
}

impl DebouncedSearch {
    pub fn new(
        backend: Arc<dyn KnowledgeSearch>,
        tx: mpsc::UnboundedSender<SearchUpdate>,
        debounce: Duration,
        limit: usize,
    ) -> Self {
        Self {
            backend,
            fallback: Arc::new(KeywordFallback::builtin()),
            tx,
            debounce,
            limit,
            seq: 0,
            pending: None,
        }
    }

    pub fn with_fallback(mut self, fallback: KeywordFallback) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Sequence number of the most recent submit
    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// Whether a request is waiting or running
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Start a new request for `query`, superseding any pending one.
    ///
    /// Empty queries only cancel. Must be called inside a tokio runtime.
    pub fn submit(&mut self, query: &str) -> u64 {
        self.seq += 1;
        let seq = self.seq;
        self.cancel();

        let query = query.trim().to_string();
        if query.is_empty() {
            return seq;
        }

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let backend = self.backend.clone();
        let fallback = self.fallback.clone();
        let tx = self.tx.clone();
        let debounce = self.debounce;
        let limit = self.limit;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = backend.search(&query, limit) => result,
            };

            let (suggestions, source) = match result {
                Ok(suggestions) => (suggestions, SuggestionSource::Index),
                Err(e) => {
                    tracing::warn!(error = %e, query = %query, "Knowledge search failed, using keyword fallback");
                    (fallback.search(&query, limit), SuggestionSource::Fallback)
                }
            };

            if token.is_cancelled() {
                return;
            }

            tracing::debug!(seq, query = %query, count = suggestions.len(), "Search results ready");
            let _ = tx.send(SearchUpdate {
                seq,
                query,
                suggestions,
                source,
            });
        });

        seq
    }

    /// Cancel the pending request, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
