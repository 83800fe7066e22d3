use super::Suggestion;
use crate::util::tokenize;

/// Static keyword → suggestion table used when the search backend fails
#[derive(Debug, Clone, Default)]
pub struct KeywordFallback {
    entries: Vec<(Vec<&'static str>, Suggestion)>,
}

impl KeywordFallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut fallback = Self::new();
        fallback.add(
            &["rust", "cargo", "crate", "ownership", "borrow"],
            "rust-basics",
            "Rust basics",
            "Ownership, borrowing and the cargo workflow.",
        );
        fallback.add(
            &["prompt", "system", "instruction", "persona"],
            "prompting",
            "Writing system prompts",
            "How the system prompt shapes every reply.",
        );
        fallback.add(
            &["temperature", "tokens", "model", "sampling"],
            "model-params",
            "Model parameters",
            "Temperature, token limits and model choice.",
        );
        fallback.add(
            &["project", "workspace", "folder"],
            "projects",
            "Organising projects",
            "Group chats and knowledge under a project.",
        );
        fallback.add(
            &["search", "knowledge", "document", "upload"],
            "knowledge-base",
            "Knowledge base",
            "Attach documents so answers can cite them.",
        );
        fallback
    }

    pub fn add(&mut self, keywords: &[&'static str], id: &str, title: &str, snippet: &str) {
        self.entries.push((
            keywords.to_vec(),
            Suggestion {
                id: id.to_string(),
                title: title.to_string(),
                snippet: snippet.to_string(),
                score: 0.0,
            },
        ));
    }

    /// Entries with a keyword that a query term is a prefix of
    pub fn search(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<Suggestion> = self
            .entries
            .iter()
            .filter_map(|(keywords, suggestion)| {
                let matched = terms
                    .iter()
                    .filter(|term| keywords.iter().any(|k| k.starts_with(term.as_str())))
                    .count();
                (matched > 0).then(|| Suggestion {
                    score: matched as f32 / terms.len() as f32,
                    ..suggestion.clone()
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let hits = KeywordFallback::builtin().search("temp", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "model-params");
    }

    #[test]
    fn test_no_terms_no_hits() {
        assert!(KeywordFallback::builtin().search("  !! ", 5).is_empty());
    }

    #[test]
    fn test_limit_applies() {
        let hits = KeywordFallback::builtin().search("rust prompt model project search", 2);
        assert_eq!(hits.len(), 2);
    }
}
