//! HTML rendering for Folio documents.
//!
//! # Modules
//!
//! - [`html`]: pure document and catalog page rendering
//! - [`site`]: output path mapping

#![doc = include_str!("../README.md")]

pub mod html;
pub mod site;

// Re-export key items at crate root
pub use html::{escape_html, render_catalog, render_document, RenderOptions};
pub use site::{
    output_page_path, page_href, CATALOG_FILENAME, SEARCH_INDEX_DIR, SEARCH_INDEX_FILENAME,
};
