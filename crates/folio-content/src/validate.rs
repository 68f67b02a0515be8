//! Structural validation of parsed documents.
//!
//! Validation is advisory: it produces a report of findings, never an
//! error. The renderer still renders violating documents; the build decides
//! what findings mean for the exit code (strict mode).

use serde::{Deserialize, Serialize};

use crate::document::{Block, Document, Section};

/// Language tags the renderer knows how to label for highlighting.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "bash", "c", "console", "cpp", "csharp", "css", "diff", "docker", "dockerfile", "go",
    "graphql", "html", "http", "ini", "java", "javascript", "js", "json", "jsx", "kotlin",
    "makefile", "markdown", "md", "php", "plaintext", "proto", "py", "python", "r", "ruby",
    "rust", "scala", "scss", "sh", "shell", "sql", "swift", "text", "toml", "ts", "tsx", "txt",
    "typescript", "xml", "yaml", "yml",
];

/// Check whether a language tag belongs to the recognized set.
pub fn is_known_language(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    KNOWN_LANGUAGES.binary_search(&tag.as_str()).is_ok()
}

/// What kind of structural finding was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The document has no H1 heading.
    MissingTitle,
    /// The document has more than one H1 heading.
    DuplicateTitle,
    /// A code block declares no language tag.
    MissingCodeLanguage,
    /// A code block declares a language outside the recognized set.
    UnknownCodeLanguage,
    /// A heading skips a level relative to its ancestor (strict mode only).
    HeadingSkip,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MissingTitle => "missing_title",
            Self::DuplicateTitle => "duplicate_title",
            Self::MissingCodeLanguage => "missing_code_language",
            Self::UnknownCodeLanguage => "unknown_code_language",
            Self::HeadingSkip => "heading_skip",
        };
        f.write_str(name)
    }
}

/// One advisory finding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    /// Finding category.
    pub kind: FindingKind,
    /// Human-readable message.
    pub message: String,
    /// 1-based source line, where known.
    pub line: Option<usize>,
}

impl Finding {
    /// Create a new finding.
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Attach the source line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Validation options.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    /// Enable strict-only checks (heading-level skips).
    pub strict: bool,
}

/// Result of validating one document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Document id the report belongs to.
    pub document_id: String,
    /// All findings, in document order per check.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// True when no findings were recorded.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings of a given kind.
    pub fn count_of(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }

    fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}

/// Validate a document's structure.
///
/// Checks: missing H1, duplicate H1, code blocks without a language tag,
/// code blocks with unrecognized tags, and (strict mode) heading-level
/// skips. Always returns a report, never an error.
pub fn validate_document(doc: &Document, options: ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport {
        document_id: doc.id.clone(),
        ..Default::default()
    };

    check_titles(doc, &mut report);
    check_code_languages(doc, &mut report);
    if options.strict {
        check_heading_skips(doc, &mut report);
    }

    report
}

fn check_titles(doc: &Document, report: &mut ValidationReport) {
    let h1_lines: Vec<usize> = doc
        .iter_sections()
        .filter(|s| s.level == 1 && !s.title.is_empty())
        .map(|s| s.line)
        .collect();

    if h1_lines.is_empty() {
        report.add(Finding::new(
            FindingKind::MissingTitle,
            "document has no H1 heading",
        ));
    }

    for line in h1_lines.iter().skip(1) {
        report.add(
            Finding::new(FindingKind::DuplicateTitle, "document has more than one H1")
                .at_line(*line),
        );
    }
}

fn check_code_languages(doc: &Document, report: &mut ValidationReport) {
    for (block, _slug) in doc.code_blocks() {
        let Block::Code { language, line, .. } = block else {
            continue;
        };
        match language {
            None => report.add(
                Finding::new(
                    FindingKind::MissingCodeLanguage,
                    "code block declares no language tag",
                )
                .at_line(*line),
            ),
            Some(tag) if !is_known_language(tag) => report.add(
                Finding::new(
                    FindingKind::UnknownCodeLanguage,
                    format!("unrecognized code language tag '{tag}'"),
                )
                .at_line(*line),
            ),
            Some(_) => {}
        }
    }
}

fn check_heading_skips(doc: &Document, report: &mut ValidationReport) {
    fn walk(section: &Section, report: &mut ValidationReport) {
        for child in &section.children {
            if child.level > section.level + 1 {
                report.add(
                    Finding::new(
                        FindingKind::HeadingSkip,
                        format!(
                            "heading '{}' (H{}) skips levels under '{}' (H{})",
                            child.title, child.level, section.title, section.level
                        ),
                    )
                    .at_line(child.line),
                );
            }
            walk(child, report);
        }
    }

    for root in &doc.sections {
        walk(root, report);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RawDocument;
    use crate::parser::parse_document;
    use std::path::PathBuf;

    fn parse(text: &str) -> Document {
        parse_document(&RawDocument {
            path: PathBuf::from("/docs/test.md"),
            relative_path: PathBuf::from("test.md"),
            text: text.to_string(),
        })
        .unwrap()
    }

    fn validate(text: &str) -> ValidationReport {
        validate_document(&parse(text), ValidateOptions::default())
    }

    fn validate_strict(text: &str) -> ValidationReport {
        validate_document(&parse(text), ValidateOptions { strict: true })
    }

    #[test]
    fn test_known_languages_sorted() {
        let mut sorted = KNOWN_LANGUAGES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KNOWN_LANGUAGES);
    }

    #[test]
    fn test_is_known_language() {
        assert!(is_known_language("rust"));
        assert!(is_known_language("Rust"));
        assert!(is_known_language("yaml"));
        assert!(!is_known_language("klingon"));
    }

    #[test]
    fn test_clean_document() {
        let report = validate("# Title\n\nText.\n\n```rust\nfn main() {}\n```\n");
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_title() {
        let report = validate("## Only a subheading\n\nText.\n");
        assert_eq!(report.count_of(FindingKind::MissingTitle), 1);
    }

    #[test]
    fn test_missing_title_zero_headings() {
        let report = validate("Just prose, no headings.\n");
        assert_eq!(report.count_of(FindingKind::MissingTitle), 1);
    }

    #[test]
    fn test_duplicate_title() {
        let report = validate("# One\n\n# Two\n\n# Three\n");
        assert_eq!(report.count_of(FindingKind::DuplicateTitle), 2);
        let lines: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.kind == FindingKind::DuplicateTitle)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![Some(3), Some(5)]);
    }

    #[test]
    fn test_missing_code_language() {
        let report = validate("# T\n\n```\nno language\n```\n");
        assert_eq!(report.count_of(FindingKind::MissingCodeLanguage), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.line, Some(3));
    }

    #[test]
    fn test_unknown_code_language() {
        let report = validate("# T\n\n```klingon\nqapla\n```\n");
        assert_eq!(report.count_of(FindingKind::UnknownCodeLanguage), 1);
        assert!(report.findings[0].message.contains("klingon"));
    }

    #[test]
    fn test_heading_skip_strict_only() {
        let text = "# A\n\n### B\n\nBody.\n";
        assert!(validate(text).is_clean());

        let strict = validate_strict(text);
        assert_eq!(strict.count_of(FindingKind::HeadingSkip), 1);
        assert_eq!(strict.findings[0].line, Some(3));
    }

    #[test]
    fn test_no_skip_for_proper_nesting() {
        let strict = validate_strict("# A\n\n## B\n\n### C\n");
        assert!(strict.is_clean());
    }

    #[test]
    fn test_report_serializes() {
        let report = validate("```\nx\n```\n");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("missing_code_language"));
        assert!(json.contains("missing_title"));
    }

    #[test]
    fn test_report_document_id() {
        let report = validate("# T\n");
        assert_eq!(report.document_id, "test");
    }
}
