//! Site layout: mapping source paths to output artifacts.

use std::path::{Path, PathBuf};

/// Filename of the generated cross-reference index artifact.
pub const SEARCH_INDEX_FILENAME: &str = "search-index.json";

/// Directory name of the full-text search index inside the output root.
pub const SEARCH_INDEX_DIR: &str = "search";

/// Filename of the generated catalog page.
pub const CATALOG_FILENAME: &str = "index.html";

/// Map a content-root-relative markdown path to its output page path.
///
/// The site tree mirrors the input tree: `a/b/c.md` → `<out>/a/b/c.html`.
pub fn output_page_path(output_root: &Path, relative_md: &Path) -> PathBuf {
    output_root.join(relative_md.with_extension("html"))
}

/// Site-relative href for a document page, for use in the catalog.
pub fn page_href(relative_md: &Path) -> String {
    relative_md
        .with_extension("html")
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}
