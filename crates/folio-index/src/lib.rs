//! Search indexing for the Folio pipeline.
//!
//! The always-available [`XrefIndex`] maps normalized tokens from titles,
//! headings, and tags to document/section locations, and serializes to the
//! `search-index.json` site artifact.
//!
//! # Features
//!
//! - `search-tantivy`: enable the Tantivy full-text backend
//!   ([`TantivySearch`], [`Indexer`], [`QueryBuilder`])

#![doc = include_str!("../README.md")]

pub mod backend;
pub mod types;
pub mod xref;

#[cfg(feature = "search-tantivy")]
pub mod indexer;
#[cfg(feature = "search-tantivy")]
pub mod query;
#[cfg(feature = "search-tantivy")]
pub mod schema;
#[cfg(feature = "search-tantivy")]
pub mod search_doc;
#[cfg(feature = "search-tantivy")]
pub mod stopwords;
#[cfg(feature = "search-tantivy")]
pub mod tantivy_search;

// Re-export key types at crate root
pub use backend::{SearchBackend, SearchParams, SearchResult, SearchResults};
pub use types::{QueryMode, SearchConfig};
pub use xref::{tokenize, Location, XrefIndex};

#[cfg(feature = "search-tantivy")]
pub use indexer::Indexer;
#[cfg(feature = "search-tantivy")]
pub use query::QueryBuilder;
#[cfg(feature = "search-tantivy")]
pub use schema::SearchSchema;
#[cfg(feature = "search-tantivy")]
pub use search_doc::SearchDocument;
#[cfg(feature = "search-tantivy")]
pub use tantivy_search::TantivySearch;
