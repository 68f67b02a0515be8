//! Full-text index writer.
//!
//! The index is rebuilt wholesale on every build: `Indexer::new` clears any
//! existing index directory before creating a fresh one.

use std::path::Path;

use tantivy::{doc, Index, IndexWriter};

use folio_core::{Error, Result};

use crate::schema::SearchSchema;
use crate::search_doc::SearchDocument;

const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// Writes [`SearchDocument`]s into a Tantivy index directory.
pub struct Indexer {
    writer: IndexWriter,
    schema: SearchSchema,
    count: usize,
}

impl Indexer {
    /// Create a fresh index at `path`, replacing any existing one.
    pub fn new(path: &Path, schema: &SearchSchema) -> Result<Self> {
        if path.exists() {
            std::fs::remove_dir_all(path).map_err(|e| Error::io_with_path(e, path))?;
        }
        std::fs::create_dir_all(path).map_err(|e| Error::io_with_path(e, path))?;

        let index = Index::create_in_dir(path, schema.schema.clone())
            .map_err(|e| Error::operation(format!("Failed to create index: {e}")))?;

        let writer: IndexWriter = index
            .writer(WRITER_MEMORY_BYTES)
            .map_err(|e| Error::operation(format!("Failed to create index writer: {e}")))?;

        Ok(Self {
            writer,
            schema: schema.clone(),
            count: 0,
        })
    }

    /// Queue one document for indexing.
    pub fn add_document(&mut self, doc: &SearchDocument) -> Result<()> {
        let mut tantivy_doc = doc!(
            self.schema.id => doc.id.as_str(),
            self.schema.title => doc.title.as_str(),
            self.schema.headings => doc.headings.as_str(),
            self.schema.content => doc.content.as_str(),
            self.schema.path => doc.path.as_str(),
        );
        if let Some(category) = &doc.category {
            tantivy_doc.add_text(self.schema.category, category);
        }

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| Error::operation(format!("Failed to index document: {e}")))?;
        self.count += 1;
        Ok(())
    }

    /// Commit queued documents to disk.
    pub fn commit(&mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| Error::operation(format!("Failed to commit index: {e}")))?;
        log::info!("committed {} document(s) to the search index", self.count);
        Ok(())
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc(id: &str) -> SearchDocument {
        SearchDocument {
            id: id.to_string(),
            title: format!("Title for {id}"),
            headings: "Setup Usage".to_string(),
            content: "Some body text.".to_string(),
            category: Some("testing".to_string()),
            path: format!("{id}.md"),
        }
    }

    #[test]
    fn test_indexer_creates_and_commits() {
        let temp = tempfile::tempdir().unwrap();
        let index_path = temp.path().join("index");
        let schema = SearchSchema::build();

        let mut indexer = Indexer::new(&index_path, &schema).unwrap();
        indexer.add_document(&sample_doc("a")).unwrap();
        indexer.add_document(&sample_doc("b")).unwrap();
        indexer.commit().unwrap();

        assert_eq!(indexer.doc_count(), 2);
        assert!(index_path.join("meta.json").exists());
    }

    #[test]
    fn test_indexer_replaces_existing_index() {
        let temp = tempfile::tempdir().unwrap();
        let index_path = temp.path().join("index");
        let schema = SearchSchema::build();

        let mut first = Indexer::new(&index_path, &schema).unwrap();
        first.add_document(&sample_doc("old")).unwrap();
        first.commit().unwrap();
        drop(first);

        let second = Indexer::new(&index_path, &schema).unwrap();
        assert_eq!(second.doc_count(), 0);
    }

    #[test]
    fn test_document_without_category() {
        let temp = tempfile::tempdir().unwrap();
        let index_path = temp.path().join("index");
        let schema = SearchSchema::build();

        let mut indexer = Indexer::new(&index_path, &schema).unwrap();
        let mut doc = sample_doc("no-cat");
        doc.category = None;
        indexer.add_document(&doc).unwrap();
        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count(), 1);
    }
}
