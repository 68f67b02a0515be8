//! The cross-reference index: token → document/section locations.
//!
//! Built wholesale from the corpus on every build — there is no incremental
//! update path. Storage is BTree-based so that identical corpora always
//! produce byte-identical JSON artifacts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use folio_content::Document;
use folio_core::{Error, Result};

/// Where an indexed token occurs.
///
/// An empty `section_slug` marks a document-level entry (the document
/// title or a frontmatter tag).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Owning document id.
    pub document_id: String,
    /// Anchor slug of the section, empty for document-level entries.
    pub section_slug: String,
    /// Human-readable title of the entry.
    pub title: String,
}

impl Location {
    fn document(doc: &Document) -> Self {
        Self {
            document_id: doc.id.clone(),
            section_slug: String::new(),
            title: doc.display_title(),
        }
    }
}

/// Token → locations mapping over a document corpus.
///
/// Rebuilding from the same corpus yields an identical index; merging
/// per-document partial indexes is equivalent to one whole-corpus build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct XrefIndex {
    /// Number of documents indexed.
    pub document_count: usize,
    /// Normalized lowercase token → locations.
    entries: BTreeMap<String, BTreeSet<Location>>,
}

impl XrefIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over a whole corpus.
    pub fn build(documents: &[Document]) -> Self {
        let mut index = Self::new();
        for doc in documents {
            index.add_document(doc);
        }
        log::debug!(
            "built cross-reference index: {} token(s) over {} document(s)",
            index.token_count(),
            index.document_count
        );
        index
    }

    /// Index one document (title, headings, frontmatter tags).
    pub fn add_document(&mut self, doc: &Document) {
        self.document_count += 1;

        let doc_location = Location::document(doc);
        for token in tokenize(&doc.display_title()) {
            self.insert(token, doc_location.clone());
        }

        if let Some(meta) = &doc.meta {
            for tag in &meta.tags {
                for token in tokenize(tag) {
                    self.insert(token, doc_location.clone());
                }
            }
        }

        for section in doc.iter_sections() {
            if section.title.is_empty() {
                continue;
            }
            let location = Location {
                document_id: doc.id.clone(),
                section_slug: section.slug(),
                title: section.title.clone(),
            };
            for token in tokenize(&section.title) {
                self.insert(token, location.clone());
            }
        }
    }

    /// Merge another (partial) index into this one.
    pub fn merge(&mut self, other: XrefIndex) {
        self.document_count += other.document_count;
        for (token, locations) in other.entries {
            self.entries.entry(token).or_default().extend(locations);
        }
    }

    fn insert(&mut self, token: String, location: Location) {
        self.entries.entry(token).or_default().insert(location);
    }

    /// Locations for an exact token match.
    pub fn lookup_exact(&self, token: &str) -> Vec<&Location> {
        let token = token.to_lowercase();
        self.entries
            .get(&token)
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }

    /// Locations for every token starting with `prefix`, deduplicated and
    /// ordered.
    pub fn lookup_prefix(&self, prefix: &str) -> Vec<&Location> {
        let prefix = prefix.to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut merged: BTreeSet<&Location> = BTreeSet::new();
        for (token, locations) in self.entries.range(prefix.clone()..) {
            if !token.starts_with(&prefix) {
                break;
            }
            merged.extend(locations.iter());
        }
        merged.into_iter().collect()
    }

    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the deterministic JSON site artifact.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::operation(format!("index serialization: {e}")))
    }

    /// Load an index back from its JSON artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_data(format!("index JSON: {e}")))
    }
}

/// Split text into normalized lowercase tokens (alphanumeric runs).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
