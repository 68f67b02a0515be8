//! The search backend abstraction.

use async_trait::async_trait;
use serde::Serialize;

use folio_core::Result;

/// Parameters for a search request.
#[derive(Clone, Debug, Default)]
pub struct SearchParams {
    /// The query string. `*` or empty matches everything.
    pub query: String,
    /// Restrict results to one category.
    pub category: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// One search hit.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    /// Document id.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Topic category, when the document has one.
    pub category: Option<String>,
    /// Content-root-relative path.
    pub path: Option<String>,
    /// Matching snippet, when one could be generated.
    pub snippet: Option<String>,
    /// BM25 relevance score.
    pub relevance: f32,
}

/// A page of search results.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResults {
    /// The hits, most relevant first.
    pub items: Vec<SearchResult>,
    /// Number of hits before category filtering.
    pub total: usize,
    /// Which backend produced the results.
    pub backend: String,
}

/// A queryable search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search.
    async fn search(&self, params: SearchParams) -> Result<SearchResults>;

    /// Backend name for reporting.
    fn name(&self) -> &str;
}
