//! Full-text search backend using Tantivy.
//!
//! `TantivySearch` executes queries against an index produced by the build
//! pipeline: BM25 scoring, weighted multi-field search, category
//! filtering, and snippet generation.

use std::path::Path;

use async_trait::async_trait;
use tantivy::collector::TopDocs;
use tantivy::query::Query;
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, ReloadPolicy};

use folio_core::{Error, Result};

use crate::backend::{SearchBackend, SearchParams, SearchResult, SearchResults};
use crate::query::QueryBuilder;
use crate::schema::SearchSchema;
use crate::types::SearchConfig;

/// Tantivy-based full-text search backend.
pub struct TantivySearch {
    #[allow(dead_code)]
    index: Index,
    reader: IndexReader,
    schema: SearchSchema,
    config: SearchConfig,
}

impl TantivySearch {
    /// Open an existing index at the configured path.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let index_path = config
            .index_path
            .as_ref()
            .ok_or_else(|| Error::config("index_path is required for TantivySearch"))?;

        let path = Path::new(index_path);
        if !path.exists() {
            return Err(Error::not_found("Index", index_path));
        }

        let index = Index::open_in_dir(path)
            .map_err(|e| Error::operation(format!("Failed to open index: {e}")))?;

        let schema = SearchSchema::build();

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| Error::operation(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            reader,
            schema,
            config: config.clone(),
        })
    }

    /// Execute a query and return scored document addresses.
    fn execute_query(
        &self,
        query: &dyn Query,
        limit: usize,
    ) -> Result<Vec<(f32, tantivy::DocAddress)>> {
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(query, &TopDocs::with_limit(limit))
            .map_err(|e| Error::operation(format!("Search failed: {e}")))?;

        Ok(top_docs)
    }

    /// Convert Tantivy documents to search results.
    fn convert_results(
        &self,
        docs: Vec<(f32, tantivy::DocAddress)>,
        query_str: &str,
    ) -> Result<Vec<SearchResult>> {
        let searcher = self.reader.searcher();
        let mut results = Vec::with_capacity(docs.len());

        for (score, doc_address) in docs {
            let doc: tantivy::TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| Error::operation(format!("Failed to retrieve document: {e}")))?;

            let id = get_text_field(&doc, self.schema.id).unwrap_or_default();
            let title = get_text_field(&doc, self.schema.title).unwrap_or_default();
            let content = get_text_field(&doc, self.schema.content).unwrap_or_default();
            let category = get_text_field(&doc, self.schema.category);
            let path = get_text_field(&doc, self.schema.path);

            let snippet = self.generate_snippet(query_str, &content);

            results.push(SearchResult {
                id,
                title,
                category,
                path,
                snippet,
                relevance: score,
            });
        }

        Ok(results)
    }

    /// Generate a search snippet from the document content.
    fn generate_snippet(&self, query: &str, content: &str) -> Option<String> {
        let max_len = self.config.snippet_length;

        if let Some(snippet) = find_snippet_in_text(content, query, max_len) {
            return Some(snippet);
        }

        // Fall back to the start of the content.
        if content.is_empty() {
            None
        } else if content.len() > max_len {
            let cut = content
                .char_indices()
                .take_while(|(i, _)| *i < max_len)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            Some(format!("{}...", content[..cut].trim_end()))
        } else {
            Some(content.trim_end().to_string())
        }
    }
}

#[async_trait]
impl SearchBackend for TantivySearch {
    async fn search(&self, params: SearchParams) -> Result<SearchResults> {
        let limit = params.limit.unwrap_or(self.config.default_limit);

        let builder = QueryBuilder::new(&self.schema, &self.config);
        let query = builder.build_query(&params.query)?;

        let docs = self.execute_query(query.as_ref(), limit)?;
        let total = docs.len();

        let mut items = self.convert_results(docs, &params.query)?;

        if let Some(ref category) = params.category {
            items.retain(|r| {
                r.category
                    .as_ref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            });
        }

        Ok(SearchResults {
            items,
            total,
            backend: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "tantivy"
    }
}

/// Get a text field value from a Tantivy document.
fn get_text_field(doc: &tantivy::TantivyDocument, field: tantivy::schema::Field) -> Option<String> {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// Find a snippet of text containing the query, cut on word boundaries.
fn find_snippet_in_text(text: &str, query: &str, max_len: usize) -> Option<String> {
    if query.is_empty() || query == "*" {
        return None;
    }

    let text_lower = text.to_lowercase();
    let query_lower = query.to_lowercase();

    let pos = text_lower.find(&query_lower)?;

    let context = max_len / 4;
    let start = pos.saturating_sub(context);
    let end = (start + max_len).min(text.len());

    let start = if start > 0 {
        text[..start]
            .rfind(char::is_whitespace)
            .map(|p| p + 1)
            .unwrap_or(start)
    } else {
        0
    };

    let end = if end < text.len() {
        text[end..]
            .find(char::is_whitespace)
            .map(|p| end + p)
            .unwrap_or(end)
    } else {
        text.len()
    };

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(text[start..end].trim());
    if end < text.len() {
        snippet.push_str("...");
    }

    Some(snippet)
}

impl std::fmt::Debug for TantivySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivySearch")
            .field("config.index_path", &self.config.index_path)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::Indexer;
    use crate::search_doc::SearchDocument;

    /// Create a temp index with test documents and return the config.
    fn create_test_index() -> (tempfile::TempDir, SearchConfig) {
        let temp_dir = tempfile::tempdir().unwrap();
        let index_path = temp_dir.path().join("index");

        let schema = SearchSchema::build();
        let mut indexer = Indexer::new(&index_path, &schema).unwrap();

        indexer
            .add_document(&SearchDocument {
                id: "docker/intro".into(),
                title: "Docker Basics".into(),
                headings: "Docker Basics Installing Docker Running Containers".into(),
                content: "Containers package an application with its dependencies.".into(),
                category: Some("docker".into()),
                path: "docker/intro.md".into(),
            })
            .unwrap();

        indexer
            .add_document(&SearchDocument {
                id: "testing/unit".into(),
                title: "Unit Testing".into(),
                headings: "Unit Testing Arrange Act Assert".into(),
                content: "A unit test exercises one function in isolation.".into(),
                category: Some("testing".into()),
                path: "testing/unit.md".into(),
            })
            .unwrap();

        indexer
            .add_document(&SearchDocument {
                id: "testing/e2e".into(),
                title: "End to End Testing".into(),
                headings: "End to End Testing Browser Drivers".into(),
                content: "End to end tests drive the whole system through its UI.".into(),
                category: Some("testing".into()),
                path: "testing/e2e.md".into(),
            })
            .unwrap();

        indexer.commit().unwrap();

        let config = SearchConfig {
            index_path: Some(index_path.to_string_lossy().to_string()),
            ..Default::default()
        };

        (temp_dir, config)
    }

    #[test]
    fn test_tantivy_search_creation() {
        let (_temp, config) = create_test_index();
        assert!(TantivySearch::new(&config).is_ok());
    }

    #[test]
    fn test_tantivy_search_missing_index_path() {
        let config = SearchConfig::default();
        assert!(TantivySearch::new(&config).is_err());
    }

    #[test]
    fn test_tantivy_search_nonexistent_path() {
        let config = SearchConfig {
            index_path: Some("/nonexistent/path/to/index".to_string()),
            ..Default::default()
        };
        assert!(TantivySearch::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_tantivy_search_simple_query() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "docker".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!results.items.is_empty());
        assert_eq!(results.backend, "tantivy");
        assert_eq!(results.items[0].id, "docker/intro");
    }

    #[tokio::test]
    async fn test_tantivy_search_wildcard_returns_all() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "*".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.items.len(), 3);
    }

    #[tokio::test]
    async fn test_tantivy_search_category_filter() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "*".to_string(),
                category: Some("testing".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.items.len(), 2);
        for item in &results.items {
            assert_eq!(item.category.as_deref(), Some("testing"));
        }
    }

    #[tokio::test]
    async fn test_tantivy_search_limit() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "*".to_string(),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(results.items.len() <= 1);
    }

    #[tokio::test]
    async fn test_tantivy_search_title_match_ranks_first() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "unit testing".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!results.items.is_empty());
        assert_eq!(results.items[0].id, "testing/unit");
    }

    #[tokio::test]
    async fn test_tantivy_search_stemmed_match() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        // "tests" stems to the same token as "test"/"testing".
        let results = backend
            .search(SearchParams {
                query: "tests".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!results.items.is_empty());
    }

    #[tokio::test]
    async fn test_tantivy_search_no_results() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "xyznonexistent".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(results.items.is_empty());
    }

    #[tokio::test]
    async fn test_tantivy_search_result_fields() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();

        let results = backend
            .search(SearchParams {
                query: "containers".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let item = results
            .items
            .iter()
            .find(|r| r.id == "docker/intro")
            .unwrap();
        assert_eq!(item.title, "Docker Basics");
        assert_eq!(item.path.as_deref(), Some("docker/intro.md"));
        assert!(item.relevance > 0.0);
    }

    #[test]
    fn test_find_snippet_in_text_basic() {
        let text = "This tutorial covers docker networking in depth";
        let snippet = find_snippet_in_text(text, "docker", 30);
        assert!(snippet.is_some());
        assert!(snippet.unwrap().contains("docker"));
    }

    #[test]
    fn test_find_snippet_in_text_not_found() {
        assert!(find_snippet_in_text("This is a test", "nonexistent", 30).is_none());
    }

    #[test]
    fn test_find_snippet_in_text_empty_query() {
        assert!(find_snippet_in_text("Some text", "", 30).is_none());
        assert!(find_snippet_in_text("Some text", "*", 30).is_none());
    }

    #[test]
    fn test_find_snippet_in_text_case_insensitive() {
        let text = "DOCKER is a container runtime";
        assert!(find_snippet_in_text(text, "docker", 50).is_some());
    }

    #[test]
    fn test_debug_format() {
        let (_temp, config) = create_test_index();
        let backend = TantivySearch::new(&config).unwrap();
        assert!(format!("{backend:?}").contains("TantivySearch"));
    }
}
