//! Handler functions for the search CLI command.
//!
//! Token lookups (`--exact`, `--prefix`) run against the
//! `search-index.json` artifact; free-text queries go to the Tantivy index
//! when the `search-tantivy` feature is enabled.

use std::path::{Path, PathBuf};

use folio_core::{Error, Result};
use folio_index::{SearchConfig, XrefIndex};
use folio_render::SEARCH_INDEX_FILENAME;

#[cfg(feature = "search-tantivy")]
use folio_index::{SearchBackend, SearchParams, TantivySearch};
#[cfg(feature = "search-tantivy")]
use folio_render::SEARCH_INDEX_DIR;

/// Which index a search request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Free-text query against the full-text index.
    FullText,
    /// Exact token lookup against the cross-reference index.
    Exact,
    /// Prefix token lookup against the cross-reference index.
    Prefix,
}

/// Options for one search request.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Site directory holding the built indexes.
    pub site_root: PathBuf,
    /// The query string.
    pub query: String,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Restrict full-text results to one category.
    pub category: Option<String>,
    /// Which index to query.
    pub mode: SearchMode,
}

/// Handle a search command.
pub async fn handle_search(index_config: &SearchConfig, options: SearchOptions) -> Result<()> {
    match options.mode {
        SearchMode::Exact => {
            let index = load_xref(&options.site_root).await?;
            let hits = index.lookup_exact(&options.query);
            print_locations(&options.query, &hits, options.limit);
            Ok(())
        }
        SearchMode::Prefix => {
            let index = load_xref(&options.site_root).await?;
            let hits = index.lookup_prefix(&options.query);
            print_locations(&options.query, &hits, options.limit);
            Ok(())
        }
        SearchMode::FullText => full_text_search(index_config, &options).await,
    }
}

/// Load the cross-reference index artifact from a built site.
pub async fn load_xref(site_root: &Path) -> Result<XrefIndex> {
    let path = site_root.join(SEARCH_INDEX_FILENAME);
    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io_with_path(e, &path))?;
    XrefIndex::from_json(&json)
}

fn print_locations(query: &str, hits: &[&folio_index::Location], limit: Option<usize>) {
    if hits.is_empty() {
        println!("No matches for '{query}'");
        return;
    }

    let shown = limit.unwrap_or(hits.len()).min(hits.len());
    for location in &hits[..shown] {
        if location.section_slug.is_empty() {
            println!("{}  {}", location.document_id, location.title);
        } else {
            println!(
                "{}#{}  {}",
                location.document_id, location.section_slug, location.title
            );
        }
    }
    if shown < hits.len() {
        println!("... and {} more", hits.len() - shown);
    }
}

#[cfg(feature = "search-tantivy")]
async fn full_text_search(index_config: &SearchConfig, options: &SearchOptions) -> Result<()> {
    let mut config = index_config.clone();
    config.index_path = Some(
        options
            .site_root
            .join(SEARCH_INDEX_DIR)
            .to_string_lossy()
            .to_string(),
    );

    let backend = TantivySearch::new(&config)?;
    let results = backend
        .search(SearchParams {
            query: options.query.clone(),
            category: options.category.clone(),
            limit: options.limit,
        })
        .await?;

    if results.items.is_empty() {
        println!("No results for '{}'", options.query);
        return Ok(());
    }

    for item in &results.items {
        println!("{:>6.2}  {}  {}", item.relevance, item.id, item.title);
        if let Some(snippet) = &item.snippet {
            println!("        {snippet}");
        }
    }
    Ok(())
}

#[cfg(not(feature = "search-tantivy"))]
async fn full_text_search(_index_config: &SearchConfig, _options: &SearchOptions) -> Result<()> {
    Err(Error::config(
        "full-text search requires the search-tantivy feature; use --exact or --prefix",
    ))
}

// ============================================================================
// Tests
// ============================================================================
