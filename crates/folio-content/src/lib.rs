//! Markdown document model, parsing, and structural validation.
//!
//! This crate turns raw markdown files into structured [`Document`]s and
//! checks them against the catalog's structural conventions.
//!
//! # Modules
//!
//! - [`document`]: Document / Section / Block model and re-serialization
//! - [`frontmatter`]: YAML frontmatter extraction
//! - [`parser`]: markdown parsing with heading-stack nesting
//! - [`loader`]: corpus discovery and reading
//! - [`validate`]: advisory structural validation

#![doc = include_str!("../README.md")]

pub mod document;
pub mod frontmatter;
pub mod loader;
pub mod parser;
pub mod validate;

// Re-export commonly used types
pub use document::{
    id_from_relative_path, slugify, Block, DocMeta, Document, RawDocument, Section,
};
pub use frontmatter::{extract_frontmatter, strip_frontmatter, FrontmatterResult};
pub use loader::{load_corpus, LoadFailure, LoadedCorpus};
pub use parser::{markdown_options, parse_document};
pub use validate::{
    is_known_language, validate_document, Finding, FindingKind, ValidateOptions,
    ValidationReport, KNOWN_LANGUAGES,
};
