//! YAML frontmatter extraction.
//!
//! Frontmatter is an optional block delimited by `---` lines at the very
//! top of a file. Extraction returns the generic YAML value; callers
//! deserialize into their own metadata types.
//!
//! # Example
//!
//! ```
//! use folio_content::frontmatter::extract_frontmatter;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Meta {
//!     title: String,
//! }
//!
//! let text = "---\ntitle: Hello\n---\n\nBody";
//! let result = extract_frontmatter(text).unwrap();
//! let meta: Option<Meta> = result.deserialize().unwrap();
//! assert_eq!(meta.unwrap().title, "Hello");
//! assert_eq!(result.body(text), "\nBody");
//! ```

use folio_core::{Error, Result};
use serde::de::DeserializeOwned;

/// Result of frontmatter extraction.
#[derive(Debug, Clone)]
pub struct FrontmatterResult {
    /// The raw YAML between the delimiters, when a block was present.
    pub yaml: Option<String>,
    /// Byte offset where the body starts.
    pub body_offset: usize,
    /// Number of source lines consumed by the block (including both
    /// delimiter lines); 0 when absent.
    pub line_offset: usize,
}

impl FrontmatterResult {
    /// The body text following the frontmatter block.
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.body_offset..]
    }

    /// Parse the YAML into a generic value.
    pub fn value(&self) -> Result<Option<serde_yaml::Value>> {
        match &self.yaml {
            None => Ok(None),
            Some(yaml) => serde_yaml::from_str(yaml)
                .map(Some)
                .map_err(|e| Error::invalid_data(format!("frontmatter YAML: {e}"))),
        }
    }

    /// Deserialize the YAML into a typed value.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.yaml {
            None => Ok(None),
            Some(yaml) => serde_yaml::from_str(yaml)
                .map(Some)
                .map_err(|e| Error::invalid_data(format!("frontmatter YAML: {e}"))),
        }
    }
}

/// Extract the frontmatter block from the top of a document.
///
/// A block opens when the first line is exactly `---` and closes at the
/// next `---` line.
///
/// # Errors
///
/// Fails with an invalid-data error when the block opens but never closes;
/// the parser maps this onto a parse error at line 1.
pub fn extract_frontmatter(text: &str) -> Result<FrontmatterResult> {
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(FrontmatterResult {
            yaml: None,
            body_offset: 0,
            line_offset: 0,
        });
    };

    if first.trim_end() != "---" {
        return Ok(FrontmatterResult {
            yaml: None,
            body_offset: 0,
            line_offset: 0,
        });
    }

    let mut offset = first.len();
    let mut line_count = 1;
    let yaml_start = offset;

    for line in lines {
        line_count += 1;
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == "---" {
            return Ok(FrontmatterResult {
                yaml: Some(text[yaml_start..line_start].to_string()),
                body_offset: offset,
                line_offset: line_count,
            });
        }
    }

    Err(Error::invalid_data("unterminated frontmatter block"))
}

/// Return the document body with any frontmatter block removed.
///
/// An unterminated block is left in place; the structural parser reports
/// that case as a parse error.
pub fn strip_frontmatter(text: &str) -> &str {
    match extract_frontmatter(text) {
        Ok(result) => result.body(text),
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct TestMeta {
        title: String,
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_extract_none() {
        let result = extract_frontmatter("# Just a doc\n\nBody").unwrap();
        assert!(result.yaml.is_none());
        assert_eq!(result.body_offset, 0);
        assert_eq!(result.line_offset, 0);
    }

    #[test]
    fn test_extract_basic() {
        let text = "---\ntitle: Docker Basics\n---\n# Heading\n";
        let result = extract_frontmatter(text).unwrap();
        assert_eq!(result.yaml.as_deref(), Some("title: Docker Basics\n"));
        assert_eq!(result.line_offset, 3);
        assert_eq!(result.body(text), "# Heading\n");
    }

    #[test]
    fn test_extract_typed() {
        let text = "---\ntitle: Testing\ntags:\n  - unit\n  - e2e\n---\nBody";
        let result = extract_frontmatter(text).unwrap();
        let meta: Option<TestMeta> = result.deserialize().unwrap();
        let meta = meta.unwrap();
        assert_eq!(meta.title, "Testing");
        assert_eq!(meta.tags.unwrap(), vec!["unit", "e2e"]);
    }

    #[test]
    fn test_extract_value() {
        let text = "---\ntitle: X\n---\n";
        let value = extract_frontmatter(text).unwrap().value().unwrap().unwrap();
        assert_eq!(value["title"], serde_yaml::Value::from("X"));
    }

    #[test]
    fn test_extract_unterminated() {
        let text = "---\ntitle: never closed\n\n# Heading\n";
        assert!(extract_frontmatter(text).is_err());
    }

    #[test]
    fn test_extract_dashes_later_are_not_frontmatter() {
        let text = "# Heading\n\n---\ntitle: not frontmatter\n---\n";
        let result = extract_frontmatter(text).unwrap();
        assert!(result.yaml.is_none());
    }

    #[test]
    fn test_extract_empty_input() {
        let result = extract_frontmatter("").unwrap();
        assert!(result.yaml.is_none());
    }

    #[test]
    fn test_extract_bad_yaml() {
        let text = "---\n: [unbalanced\n---\nBody";
        let result = extract_frontmatter(text).unwrap();
        assert!(result.value().is_err());
    }

    #[test]
    fn test_strip_frontmatter() {
        assert_eq!(strip_frontmatter("---\na: 1\n---\nBody"), "Body");
        assert_eq!(strip_frontmatter("No frontmatter"), "No frontmatter");
    }

    #[test]
    fn test_strip_unterminated_left_in_place() {
        let text = "---\nnever closed\n";
        assert_eq!(strip_frontmatter(text), text);
    }
}
