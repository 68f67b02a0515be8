//! Query building with weighted multi-field search.
//!
//! `QueryBuilder` turns a user query string into a Tantivy query:
//! quoted phrases become phrase queries, remaining terms are stemmed
//! through the same analyzer used at index time, and every searchable
//! field contributes with its schema boost.
//!
//! # Query modes
//!
//! - **Smart** (default): AND for 1–2 terms, OR for longer queries
//! - **And**: all terms must match
//! - **Or**: any term can match

use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer, TokenStream};
use tantivy::Term;

use folio_core::Result;

use crate::schema::SearchSchema;
use crate::stopwords::StopwordFilter;
use crate::types::{QueryMode, SearchConfig};

/// Query builder for the Folio search schema.
pub struct QueryBuilder<'a> {
    schema: &'a SearchSchema,
    config: &'a SearchConfig,
    stopword_filter: StopwordFilter,
}

impl<'a> QueryBuilder<'a> {
    /// Create a new query builder.
    pub fn new(schema: &'a SearchSchema, config: &'a SearchConfig) -> Self {
        let stopword_filter = StopwordFilter::new(config);
        Self {
            schema,
            config,
            stopword_filter,
        }
    }

    /// Build a query from a search string.
    pub fn build_query(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let query_str = query_str.trim();

        if query_str.is_empty() || query_str == "*" {
            return Ok(Box::new(tantivy::query::AllQuery));
        }

        let filtered = self.stopword_filter.filter(query_str);
        let (phrases, remaining) = parse_phrases(&filtered);
        let terms: Vec<&str> = remaining.split_whitespace().collect();

        let mut field_queries: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for (field, boost) in self.schema.full_text_fields() {
            let mut term_queries: Vec<(Occur, Box<dyn Query>)> = Vec::new();

            for phrase in &phrases {
                if let Some(pq) = self.create_phrase_query(field, phrase) {
                    term_queries.push((Occur::Should, Box::new(BoostQuery::new(pq, boost))));
                }
            }

            let occur = self.determine_occur_mode(&terms);
            for term in &terms {
                let tq = self.create_term_query(field, term);
                term_queries.push((occur, Box::new(BoostQuery::new(tq, boost))));
            }

            if !term_queries.is_empty() {
                let field_query = BooleanQuery::new(term_queries);
                field_queries.push((Occur::Should, Box::new(field_query)));
            }
        }

        if field_queries.is_empty() {
            return Ok(Box::new(tantivy::query::AllQuery));
        }

        Ok(Box::new(BooleanQuery::new(field_queries)))
    }

    /// Pick the occur mode from config and term count.
    fn determine_occur_mode(&self, terms: &[&str]) -> Occur {
        match self.config.query_mode {
            QueryMode::And => Occur::Must,
            QueryMode::Or => Occur::Should,
            QueryMode::Smart => {
                if terms.len() <= 2 {
                    Occur::Must
                } else {
                    Occur::Should
                }
            }
        }
    }

    /// Tokenize text through the same analyzer used for indexing.
    ///
    /// Returns stemmed/lowercased tokens (e.g., "testing" → "test").
    fn analyze(&self, text: &str) -> Vec<String> {
        let mut analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(Stemmer::new(Language::English))
            .build();
        let mut tokens = Vec::new();
        let mut stream = analyzer.token_stream(text);
        while let Some(token) = stream.next() {
            tokens.push(token.text.clone());
        }
        tokens
    }

    /// Create a phrase query for exact matching.
    fn create_phrase_query(
        &self,
        field: tantivy::schema::Field,
        phrase: &str,
    ) -> Option<Box<dyn Query>> {
        let terms: Vec<Term> = self
            .analyze(phrase)
            .into_iter()
            .map(|tok| Term::from_field_text(field, &tok))
            .collect();

        if terms.is_empty() {
            return None;
        }

        if terms.len() == 1 {
            return Some(Box::new(TermQuery::new(
                terms[0].clone(),
                IndexRecordOption::WithFreqs,
            )));
        }

        Some(Box::new(tantivy::query::PhraseQuery::new(terms)))
    }

    /// Create a term query (optionally fuzzy).
    fn create_term_query(&self, field: tantivy::schema::Field, term: &str) -> Box<dyn Query> {
        let analyzed = self.analyze(term);
        let token = analyzed.first().map(|s| s.as_str()).unwrap_or(term);
        let term_obj = Term::from_field_text(field, token);

        if self.config.fuzzy_enabled && term.len() >= 4 {
            Box::new(tantivy::query::FuzzyTermQuery::new(
                term_obj,
                self.config.fuzzy_distance,
                true,
            ))
        } else {
            Box::new(TermQuery::new(term_obj, IndexRecordOption::WithFreqs))
        }
    }
}

/// Parse quoted phrases from a query string.
///
/// Returns (phrases, remaining text without quotes). An unclosed quote is
/// left in the remaining text.
fn parse_phrases(query: &str) -> (Vec<String>, String) {
    let mut phrases = Vec::new();
    let mut remaining = query.to_string();

    while let Some(start) = remaining.find('"') {
        if let Some(end) = remaining[start + 1..].find('"') {
            let phrase = remaining[start + 1..start + 1 + end].trim().to_string();
            if !phrase.is_empty() {
                phrases.push(phrase);
            }
            remaining.replace_range(start..start + end + 2, " ");
        } else {
            break;
        }
    }

    (phrases, remaining)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_builder() -> QueryBuilder<'static> {
        static SCHEMA: std::sync::OnceLock<SearchSchema> = std::sync::OnceLock::new();
        static CONFIG: std::sync::OnceLock<SearchConfig> = std::sync::OnceLock::new();

        let schema = SCHEMA.get_or_init(SearchSchema::build);
        let config = CONFIG.get_or_init(SearchConfig::default);

        QueryBuilder::new(schema, config)
    }

    #[test]
    fn test_build_simple_query() {
        assert!(test_builder().build_query("docker").is_ok());
    }

    #[test]
    fn test_build_multi_term_query() {
        assert!(test_builder().build_query("unit testing").is_ok());
    }

    #[test]
    fn test_build_phrase_query() {
        assert!(test_builder().build_query("\"unit testing\"").is_ok());
    }

    #[test]
    fn test_build_empty_and_wildcard_query() {
        assert!(test_builder().build_query("").is_ok());
        assert!(test_builder().build_query("*").is_ok());
        assert!(test_builder().build_query("   ").is_ok());
    }

    #[test]
    fn test_build_query_with_fuzzy() {
        let config = SearchConfig {
            fuzzy_enabled: true,
            fuzzy_distance: 1,
            ..Default::default()
        };
        let schema = SearchSchema::build();
        let builder = QueryBuilder::new(&schema, &config);
        assert!(builder.build_query("containers").is_ok());
    }

    #[test]
    fn test_analyze_stems() {
        let builder = test_builder();
        assert_eq!(builder.analyze("Testing"), vec!["test"]);
    }

    #[test]
    fn test_parse_phrases_single() {
        let (phrases, remaining) = parse_phrases("\"exact phrase\" other");
        assert_eq!(phrases, vec!["exact phrase"]);
        assert!(remaining.contains("other"));
    }

    #[test]
    fn test_parse_phrases_multiple() {
        let (phrases, remaining) = parse_phrases("\"one\" word \"two\"");
        assert_eq!(phrases.len(), 2);
        assert!(remaining.contains("word"));
    }

    #[test]
    fn test_parse_phrases_none() {
        let (phrases, remaining) = parse_phrases("no phrases here");
        assert!(phrases.is_empty());
        assert_eq!(remaining.trim(), "no phrases here");
    }

    #[test]
    fn test_parse_phrases_empty_quotes() {
        let (phrases, remaining) = parse_phrases("\"\" something");
        assert!(phrases.is_empty());
        assert!(remaining.contains("something"));
    }

    #[test]
    fn test_parse_phrases_unclosed_quote() {
        let (phrases, remaining) = parse_phrases("\"unclosed phrase");
        assert!(phrases.is_empty());
        assert!(remaining.contains("unclosed"));
    }

    #[test]
    fn test_determine_occur_mode_smart() {
        let builder = test_builder();
        assert_eq!(builder.determine_occur_mode(&["one", "two"]), Occur::Must);
        assert_eq!(
            builder.determine_occur_mode(&["one", "two", "three"]),
            Occur::Should
        );
    }

    #[test]
    fn test_determine_occur_mode_and_or() {
        let schema = SearchSchema::build();

        let and_config = SearchConfig {
            query_mode: QueryMode::And,
            ..Default::default()
        };
        let builder = QueryBuilder::new(&schema, &and_config);
        assert_eq!(
            builder.determine_occur_mode(&["one", "two", "three"]),
            Occur::Must
        );

        let or_config = SearchConfig {
            query_mode: QueryMode::Or,
            ..Default::default()
        };
        let builder = QueryBuilder::new(&schema, &or_config);
        assert_eq!(builder.determine_occur_mode(&["one"]), Occur::Should);
    }

    #[test]
    fn test_build_mixed_phrase_and_terms() {
        assert!(test_builder()
            .build_query("\"docker compose\" volumes networking")
            .is_ok());
    }

    #[test]
    fn test_build_query_with_stopwords() {
        // "what is a" filters away, leaving "vector"
        assert!(test_builder().build_query("what is a vector").is_ok());
    }
}
