//! Markdown parser and normalizer.
//!
//! Turns a [`RawDocument`] into a structured [`Document`]: frontmatter comes
//! off first, the body is pre-scanned for unterminated code fences (the one
//! malformation this pipeline refuses to recover from), and a
//! `pulldown-cmark` offset walk then builds the section tree.
//!
//! Heading nesting uses an explicit stack of open ancestors: pushing a
//! heading of level L first closes every open section of level ≥ L, then
//! attaches the new section to the top of the stack, or as a root when the
//! stack is empty. Skipped levels (H1 → H3) therefore attach to the nearest
//! lower-level ancestor; they are never rejected.
//!
//! Only top-level headings and code blocks become structure. Content inside
//! lists or blockquotes (including fenced code) stays part of the
//! surrounding prose run, preserved verbatim.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use folio_core::{Error, Result};

use crate::document::{Block, DocMeta, Document, RawDocument, Section};
use crate::frontmatter::extract_frontmatter;

/// Markdown extensions enabled for structural parsing and rendering.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse a raw markdown file into a structured document.
///
/// # Errors
///
/// Fails with a parse error carrying the source line when the document is
/// malformed beyond recovery: an unterminated frontmatter block, invalid
/// frontmatter YAML, or an unterminated code fence.
pub fn parse_document(raw: &RawDocument) -> Result<Document> {
    let fm = extract_frontmatter(&raw.text)
        .map_err(|_| Error::parse(&raw.path, 1, "unterminated frontmatter block"))?;

    let meta: Option<DocMeta> = fm
        .deserialize()
        .map_err(|e| Error::parse(&raw.path, 1, e.to_string()))?;

    let body = fm.body(&raw.text);
    let line_offset = fm.line_offset;

    if let Err(fence_line) = scan_fences(body) {
        return Err(Error::parse(
            &raw.path,
            fence_line + line_offset,
            "unterminated code fence",
        ));
    }

    let (title, preamble, sections) = build_sections(body, line_offset);

    log::debug!(
        "parsed {} ({} section(s))",
        raw.relative_path.display(),
        sections.iter().map(Section::subtree_len).sum::<usize>()
    );

    Ok(Document {
        id: raw.id(),
        path: raw.path.clone(),
        relative_path: raw.relative_path.clone(),
        title,
        meta,
        preamble,
        sections,
        source: raw.text.clone(),
    })
}

// ============================================================================
// Fence pre-scan
// ============================================================================

/// Check that every fenced code block is terminated.
///
/// Returns `Err(line)` with the 1-based body line of the offending opening
/// fence. Fence openings indented four or more spaces are indented code,
/// not fences.
fn scan_fences(body: &str) -> std::result::Result<(), usize> {
    let mut open: Option<(char, usize)> = None;
    let mut open_line = 0;

    for (i, line) in body.lines().enumerate() {
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();

        match open {
            None => {
                if indent < 4 {
                    if let Some(fence) = fence_opening(trimmed) {
                        open = Some(fence);
                        open_line = i + 1;
                    }
                }
            }
            Some((ch, len)) => {
                let run = trimmed.chars().take_while(|c| *c == ch).count();
                if run >= len && trimmed[run..].trim().is_empty() {
                    open = None;
                }
            }
        }
    }

    match open {
        Some(_) => Err(open_line),
        None => Ok(()),
    }
}

/// Detect a fence opening on an indent-stripped line.
fn fence_opening(trimmed: &str) -> Option<(char, usize)> {
    for ch in ['`', '~'] {
        let run = trimmed.chars().take_while(|c| *c == ch).count();
        if run >= 3 {
            // A backtick fence's info string may not contain backticks.
            if ch == '`' && trimmed[run..].contains('`') {
                return None;
            }
            return Some((ch, run));
        }
    }
    None
}

// ============================================================================
// Section tree construction
// ============================================================================

/// Byte-offset to line-number mapping for one body.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line containing the given byte offset.
    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

enum Mode {
    Body,
    Heading,
    Code,
}

/// Walk the markdown events and build the section forest.
///
/// Returns (first H1 text, preamble blocks, root sections).
fn build_sections(body: &str, line_offset: usize) -> (String, Vec<Block>, Vec<Section>) {
    let lines = LineIndex::new(body);
    let parser = Parser::new_ext(body, markdown_options());

    let mut stack: Vec<Section> = Vec::new();
    let mut roots: Vec<Section> = Vec::new();
    let mut preamble: Vec<Block> = Vec::new();
    let mut title: Option<String> = None;

    let mut mode = Mode::Body;
    // Container nesting depth; structure is only taken from depth 0.
    let mut depth = 0usize;
    // Start of the prose run not yet attached to a block.
    let mut prose_start = 0usize;

    let mut heading_buf = String::new();
    let mut heading_level = 1u8;
    let mut heading_line = 0usize;

    let mut code_buf = String::new();
    let mut code_lang: Option<String> = None;
    let mut code_line = 0usize;

    for (event, range) in parser.into_offset_iter() {
        match mode {
            Mode::Heading => match event {
                Event::Text(text) | Event::Code(text) => heading_buf.push_str(&text),
                Event::End(TagEnd::Heading(_)) => {
                    let text = std::mem::take(&mut heading_buf);
                    close_open_sections(&mut stack, &mut roots, heading_level);
                    if heading_level == 1 && title.is_none() {
                        title = Some(text.clone());
                    }
                    stack.push(Section {
                        level: heading_level,
                        title: text,
                        line: heading_line,
                        blocks: Vec::new(),
                        children: Vec::new(),
                    });
                    mode = Mode::Body;
                }
                _ => {}
            },
            Mode::Code => match event {
                Event::Text(text) => code_buf.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let text = std::mem::take(&mut code_buf);
                    attach_block(
                        &mut stack,
                        &mut preamble,
                        Block::Code {
                            language: code_lang.take(),
                            text: text.trim_end_matches('\n').to_string(),
                            line: code_line,
                        },
                    );
                    mode = Mode::Body;
                }
                _ => {}
            },
            Mode::Body => match event {
                Event::Start(Tag::Heading { level, .. }) if depth == 0 => {
                    flush_prose(body, prose_start, range.start, &mut stack, &mut preamble);
                    prose_start = range.end;
                    heading_level = heading_level_number(level);
                    heading_line = lines.line_of(range.start) + line_offset;
                    mode = Mode::Heading;
                }
                Event::Start(Tag::CodeBlock(kind)) if depth == 0 => {
                    flush_prose(body, prose_start, range.start, &mut stack, &mut preamble);
                    prose_start = range.end;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string)
                            .filter(|s| !s.is_empty()),
                        CodeBlockKind::Indented => None,
                    };
                    code_line = lines.line_of(range.start) + line_offset;
                    mode = Mode::Code;
                }
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }

    flush_prose(body, prose_start, body.len(), &mut stack, &mut preamble);
    close_open_sections(&mut stack, &mut roots, 1);

    // A heading-less document becomes a single root section with an empty
    // title holding the whole body.
    if roots.is_empty() {
        roots.push(Section {
            level: 1,
            title: String::new(),
            line: 1,
            blocks: std::mem::take(&mut preamble),
            children: Vec::new(),
        });
    }

    (title.unwrap_or_default(), preamble, roots)
}

/// Close every open section of level ≥ `level`, attaching each to the
/// section below it on the stack, or to the roots.
fn close_open_sections(stack: &mut Vec<Section>, roots: &mut Vec<Section>, level: u8) {
    loop {
        match stack.last() {
            Some(top) if top.level >= level => {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => roots.push(done),
                    }
                }
            }
            _ => break,
        }
    }
}

/// Attach a block to the innermost open section, or to the preamble.
fn attach_block(stack: &mut [Section], preamble: &mut Vec<Block>, block: Block) {
    match stack.last_mut() {
        Some(section) => section.blocks.push(block),
        None => preamble.push(block),
    }
}

/// Flush the pending prose span `[from..to)` as a Prose block.
fn flush_prose(
    body: &str,
    from: usize,
    to: usize,
    stack: &mut [Section],
    preamble: &mut Vec<Block>,
) {
    if to <= from {
        return;
    }
    let text = body[from..to].trim();
    if text.is_empty() {
        return;
    }
    attach_block(stack, preamble, Block::Prose(text.to_string()));
}

fn heading_level_number(level: HeadingLevel) -> u8 {
    level as u8
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(text: &str) -> RawDocument {
        RawDocument {
            path: PathBuf::from("/docs/test.md"),
            relative_path: PathBuf::from("test.md"),
            text: text.to_string(),
        }
    }

    fn parse(text: &str) -> Document {
        parse_document(&raw(text)).unwrap()
    }

    #[test]
    fn test_two_level_document() {
        let doc = parse("# Title\n\nIntro.\n\n## Sub\n\nDetails.\n");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "Title");
        assert_eq!(doc.sections[0].children.len(), 1);
        assert_eq!(doc.sections[0].children[0].title, "Sub");
    }

    #[test]
    fn test_skipped_level_attaches_to_nearest_ancestor() {
        let doc = parse("# A\n\n### B\n\nBody.\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "A");
        assert_eq!(doc.sections[0].children.len(), 1);
        assert_eq!(doc.sections[0].children[0].title, "B");
        assert_eq!(doc.sections[0].children[0].level, 3);
    }

    #[test]
    fn test_sibling_closes_open_section() {
        let doc = parse("# A\n\n## B\n\n## C\n\n# D\n");
        let titles: Vec<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].children.len(), 2);
    }

    #[test]
    fn test_section_count_matches_heading_count() {
        let doc = parse("# One\n\n## Two\n\n### Three\n\n## Four\n\n# Five\n");
        assert_eq!(doc.section_count(), 5);
    }

    #[test]
    fn test_pre_order_matches_source_order() {
        let doc = parse("# A\n\n### C\n\n## B\n\n# D\n\n## E\n");
        let titles: Vec<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B", "D", "E"]);
    }

    #[test]
    fn test_zero_headings_yields_single_empty_root() {
        let doc = parse("Just a paragraph.\n\nAnother one.\n");
        assert_eq!(doc.title, "");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, "");
        assert!(!doc.sections[0].blocks.is_empty());
        assert!(doc.preamble.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let doc = parse("");
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].blocks.is_empty());
    }

    #[test]
    fn test_preamble_before_first_heading() {
        let doc = parse("Lead-in text.\n\n# Title\n\nBody.\n");
        assert_eq!(doc.preamble.len(), 1);
        assert_eq!(doc.preamble[0], Block::Prose("Lead-in text.".into()));
        // Preamble is not a section: one heading, one section node.
        assert_eq!(doc.section_count(), 1);
    }

    #[test]
    fn test_code_block_with_language() {
        let doc = parse("# T\n\n```rust\nfn main() {}\n```\n");
        let blocks = doc.code_blocks();
        assert_eq!(blocks.len(), 1);
        match blocks[0].0 {
            Block::Code {
                language,
                text,
                line,
            } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(text.as_str(), "fn main() {}");
                assert_eq!(*line, 3);
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_code_block_without_language() {
        let doc = parse("# T\n\n```\nplain\n```\n");
        match doc.code_blocks()[0].0 {
            Block::Code { language, .. } => assert!(language.is_none()),
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_code_fence_info_string_extra_words() {
        let doc = parse("# T\n\n```python linenums\nprint(1)\n```\n");
        match doc.code_blocks()[0].0 {
            Block::Code { language, .. } => assert_eq!(language.as_deref(), Some("python")),
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_code_inside_list_stays_prose() {
        let doc = parse("# T\n\n- step one\n\n  ```sh\n  make\n  ```\n\n- step two\n");
        assert!(doc.code_blocks().is_empty());
        assert_eq!(doc.sections[0].blocks.len(), 1);
        match &doc.sections[0].blocks[0] {
            Block::Prose(text) => assert!(text.contains("step one")),
            other => panic!("expected prose, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_inside_blockquote_is_not_structure() {
        let doc = parse("# T\n\n> # Quoted heading\n> more quote\n");
        assert_eq!(doc.section_count(), 1);
        assert_eq!(doc.sections[0].title, "T");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let doc = parse("# Using `docker run`\n");
        assert_eq!(doc.title, "Using docker run");
    }

    #[test]
    fn test_unterminated_fence_is_parse_error() {
        let err = parse_document(&raw("# T\n\n```rust\nfn main() {}\n")).unwrap_err();
        assert!(err.is_parse());
        let msg = err.to_string();
        assert!(msg.contains("unterminated code fence"));
        assert!(msg.contains("line 3"));
    }

    #[test]
    fn test_unterminated_frontmatter_is_parse_error() {
        let err = parse_document(&raw("---\ntitle: open\n\n# T\n")).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("unterminated frontmatter"));
    }

    #[test]
    fn test_frontmatter_extracted_and_lines_shifted() {
        let doc = parse("---\ntitle: Meta\ntags: [docker]\n---\n# T\n\n```sh\nls\n```\n");
        let meta = doc.meta.clone().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Meta"));
        assert_eq!(meta.tags, vec!["docker"]);
        // Fence opens on source line 7: 4 frontmatter lines + heading + blank.
        match doc.code_blocks()[0].0 {
            Block::Code { line, .. } => assert_eq!(*line, 7),
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_lines_reported() {
        let doc = parse("# A\n\ntext\n\n## B\n");
        assert_eq!(doc.sections[0].line, 1);
        assert_eq!(doc.sections[0].children[0].line, 5);
    }

    #[test]
    fn test_setext_heading() {
        let doc = parse("Title\n=====\n\nBody.\n");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.sections[0].level, 1);
    }

    #[test]
    fn test_tilde_fence_scan() {
        let doc = parse("# T\n\n~~~yaml\nkey: value\n~~~\n");
        match doc.code_blocks()[0].0 {
            Block::Code { language, .. } => assert_eq!(language.as_deref(), Some("yaml")),
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_longer_closing_fence_accepted() {
        let doc = parse("# T\n\n```\ncode\n`````\n");
        assert_eq!(doc.code_blocks().len(), 1);
    }

    #[test]
    fn test_structure_round_trip() {
        let source = "# Title\n\nIntro text.\n\n## Setup\n\n```sh\nmake install\n```\n\n### Notes\n\nFine print.\n\n## Usage\n\nRun it.\n";
        let first = parse(source);
        let second = parse(&first.to_markdown());

        let titles_a: Vec<String> = first.iter_sections().map(|s| s.title.clone()).collect();
        let titles_b: Vec<String> = second.iter_sections().map(|s| s.title.clone()).collect();
        assert_eq!(titles_a, titles_b);

        let levels_a: Vec<u8> = first.iter_sections().map(|s| s.level).collect();
        let levels_b: Vec<u8> = second.iter_sections().map(|s| s.level).collect();
        assert_eq!(levels_a, levels_b);

        assert_eq!(first.code_blocks().len(), second.code_blocks().len());
    }

    #[test]
    fn test_duplicate_h1_both_become_roots() {
        let doc = parse("# First\n\n# Second\n");
        assert_eq!(doc.title, "First");
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn test_scan_fences_ok() {
        assert!(scan_fences("```\ncode\n```\n").is_ok());
        assert!(scan_fences("no fences at all\n").is_ok());
    }

    #[test]
    fn test_scan_fences_unterminated_line() {
        assert_eq!(scan_fences("text\n\n```rust\nfn x() {}\n"), Err(3));
    }

    #[test]
    fn test_scan_fences_indented_backticks_are_not_fences() {
        assert!(scan_fences("    ```\n    shown as code\n").is_ok());
    }

    #[test]
    fn test_scan_fences_shorter_close_does_not_close() {
        assert_eq!(scan_fences("`````\ncode\n```\n"), Err(1));
    }
}
