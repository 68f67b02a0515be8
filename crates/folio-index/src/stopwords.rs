//! Query stopword filtering.

use std::collections::HashSet;

use crate::types::SearchConfig;

/// Drops English stopwords from query strings.
///
/// Quoted phrase fragments pass through untouched, and a query made
/// entirely of stopwords is kept as-is rather than emptied out.
pub struct StopwordFilter {
    words: HashSet<String>,
    enabled: bool,
}

impl StopwordFilter {
    /// Build a filter from the search configuration.
    pub fn new(config: &SearchConfig) -> Self {
        let words = if config.filter_stopwords {
            stop_words::get(stop_words::LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            HashSet::new()
        };
        Self {
            words,
            enabled: config.filter_stopwords,
        }
    }

    /// Check a single term.
    pub fn is_stopword(&self, term: &str) -> bool {
        self.words.contains(&term.to_lowercase())
    }

    /// Remove stopword terms from a query string.
    pub fn filter(&self, query: &str) -> String {
        if !self.enabled {
            return query.to_string();
        }

        let kept: Vec<&str> = query
            .split_whitespace()
            .filter(|token| {
                if token.contains('"') {
                    return true;
                }
                let bare = token.trim_matches(|c: char| !c.is_alphanumeric());
                bare.is_empty() || !self.is_stopword(bare)
            })
            .collect();

        if kept.is_empty() {
            query.to_string()
        } else {
            kept.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> StopwordFilter {
        StopwordFilter::new(&SearchConfig::default())
    }

    #[test]
    fn test_is_stopword() {
        let f = filter();
        assert!(f.is_stopword("the"));
        assert!(f.is_stopword("The"));
        assert!(!f.is_stopword("docker"));
    }

    #[test]
    fn test_filter_drops_stopwords() {
        let f = filter();
        assert_eq!(f.filter("what is a cadence"), "cadence");
        assert_eq!(f.filter("running the tests"), "running tests");
    }

    #[test]
    fn test_filter_keeps_all_stopword_query() {
        let f = filter();
        assert_eq!(f.filter("to be or not to be"), "to be or not to be");
    }

    #[test]
    fn test_filter_keeps_quoted_fragments() {
        let f = filter();
        let filtered = f.filter("\"the pipeline\" docker");
        assert!(filtered.contains("\"the"));
        assert!(filtered.contains("docker"));
    }

    #[test]
    fn test_filter_disabled() {
        let config = SearchConfig {
            filter_stopwords: false,
            ..Default::default()
        };
        let f = StopwordFilter::new(&config);
        assert_eq!(f.filter("what is a thing"), "what is a thing");
        assert!(!f.is_stopword("the"));
    }
}
