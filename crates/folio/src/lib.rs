//! Folio — documentation catalog build pipeline.
//!
//! Umbrella crate re-exporting the Folio components. The core and content
//! layers are always available; everything else is feature-gated:
//!
//! - `index`: cross-reference and search indexing
//! - `search-tantivy`: the Tantivy full-text backend
//! - `render`: HTML rendering
//! - `cli`: the application framework and build pipeline
//! - `full`: everything

pub use folio_content as content;
pub use folio_core;

#[cfg(feature = "cli")]
pub use folio_cli as cli;
#[cfg(feature = "index")]
pub use folio_index as index;
#[cfg(feature = "render")]
pub use folio_render as render;

// Convenience re-exports of the types most callers need.
pub use folio_content::{Document, RawDocument, Section};
pub use folio_core::{AppState, ConfigProvider, Error, Result};
