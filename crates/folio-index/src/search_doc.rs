//! The flat record fed into the full-text indexer.

use folio_content::{Block, Document};

/// One document prepared for full-text indexing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchDocument {
    /// Document id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// All section headings, space-joined.
    pub headings: String,
    /// Plain body text (prose plus code).
    pub content: String,
    /// Topic category, when any.
    pub category: Option<String>,
    /// Content-root-relative path.
    pub path: String,
}

impl SearchDocument {
    /// Flatten a parsed document for indexing.
    pub fn from_document(doc: &Document) -> Self {
        let headings = doc
            .iter_sections()
            .filter(|s| !s.title.is_empty())
            .map(|s| s.title.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut content = String::new();
        let mut push_blocks = |blocks: &[Block]| {
            for block in blocks {
                match block {
                    Block::Prose(text) => {
                        content.push_str(text);
                        content.push('\n');
                    }
                    Block::Code { text, .. } => {
                        content.push_str(text);
                        content.push('\n');
                    }
                }
            }
        };
        push_blocks(&doc.preamble);
        for section in doc.iter_sections() {
            push_blocks(&section.blocks);
        }

        Self {
            id: doc.id.clone(),
            title: doc.display_title(),
            headings,
            content,
            category: doc.category(),
            path: doc.relative_path.display().to_string(),
        }
    }
}
