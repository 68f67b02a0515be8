//! Tantivy schema for the full-text index.
//!
//! Raw fields (`id`, `category`, `path`) are stored untokenized; the
//! searchable fields (`title`, `headings`, `content`) go through the
//! built-in `en_stem` analyzer so queries match across word forms.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING,
};

/// Field handles for the Folio search schema.
#[derive(Clone, Debug)]
pub struct SearchSchema {
    /// The built Tantivy schema.
    pub schema: Schema,
    /// Document id (raw, stored).
    pub id: Field,
    /// Document title (stemmed, stored).
    pub title: Field,
    /// Concatenated section headings (stemmed, stored).
    pub headings: Field,
    /// Plain-text body content (stemmed, stored for snippets).
    pub content: Field,
    /// Topic category (raw, stored).
    pub category: Field,
    /// Content-root-relative path (raw, stored).
    pub path: Field,
}

impl SearchSchema {
    /// Build the schema.
    pub fn build() -> Self {
        let mut builder = Schema::builder();

        let indexing = TextFieldIndexing::default()
            .set_tokenizer("en_stem")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let stemmed = TextOptions::default()
            .set_indexing_options(indexing)
            .set_stored();

        let id = builder.add_text_field("id", STRING | STORED);
        let title = builder.add_text_field("title", stemmed.clone());
        let headings = builder.add_text_field("headings", stemmed.clone());
        let content = builder.add_text_field("content", stemmed);
        let category = builder.add_text_field("category", STRING | STORED);
        let path = builder.add_text_field("path", STRING | STORED);

        Self {
            schema: builder.build(),
            id,
            title,
            headings,
            content,
            category,
            path,
        }
    }

    /// Searchable fields with their boost weights, strongest first.
    pub fn full_text_fields(&self) -> Vec<(Field, f32)> {
        vec![
            (self.title, 3.0),
            (self.headings, 2.0),
            (self.content, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builds() {
        let schema = SearchSchema::build();
        assert_eq!(schema.schema.get_field_name(schema.id), "id");
        assert_eq!(schema.schema.get_field_name(schema.content), "content");
    }

    #[test]
    fn test_full_text_fields_weighting() {
        let schema = SearchSchema::build();
        let fields = schema.full_text_fields();
        assert_eq!(fields.len(), 3);
        assert!(fields[0].1 > fields[1].1);
        assert!(fields[1].1 > fields[2].1);
    }
}
