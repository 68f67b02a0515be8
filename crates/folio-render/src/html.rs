//! HTML page rendering.
//!
//! `render_document` is a pure function of its inputs: the same document
//! and report always produce the same page, and nothing here touches the
//! filesystem or shares state across renders.

use pulldown_cmark::{html, Parser};

use folio_content::{markdown_options, Block, Document, Section, ValidationReport};

/// Rendering options.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Embed validation findings as an HTML review comment.
    pub review_comments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            review_comments: true,
        }
    }
}

/// Render one document to a full HTML page.
///
/// Section nesting maps to nested `<section>` elements; code blocks become
/// `<pre><code class="language-X">` (no class when the tag is absent).
/// Documents with validation findings still render, tagged for review when
/// the option is set.
pub fn render_document(
    doc: &Document,
    report: Option<&ValidationReport>,
    options: &RenderOptions,
) -> String {
    let mut out = String::with_capacity(doc.source.len() * 2);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>");
    out.push_str(&escape_html(&doc.display_title()));
    out.push_str("</title>\n</head>\n<body>\n<article>\n");

    if options.review_comments {
        if let Some(report) = report {
            if !report.is_clean() {
                push_review_comment(report, &mut out);
            }
        }
    }

    render_blocks(&doc.preamble, &mut out);
    for section in &doc.sections {
        render_section(section, &mut out);
    }

    out.push_str("</article>\n</body>\n</html>\n");
    log::trace!("rendered {} ({} bytes)", doc.id, out.len());
    out
}

/// Render the catalog page listing every built document.
///
/// `entries` are (href, title, category) triples, already ordered.
pub fn render_catalog(site_title: &str, entries: &[(String, String, Option<String>)]) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>");
    out.push_str(&escape_html(site_title));
    out.push_str("</title>\n</head>\n<body>\n<h1>");
    out.push_str(&escape_html(site_title));
    out.push_str("</h1>\n<ul class=\"catalog\">\n");

    for (href, title, category) in entries {
        out.push_str("<li><a href=\"");
        out.push_str(&escape_html(href));
        out.push_str("\">");
        out.push_str(&escape_html(title));
        out.push_str("</a>");
        if let Some(category) = category {
            out.push_str(" <span class=\"category\">");
            out.push_str(&escape_html(category));
            out.push_str("</span>");
        }
        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

fn push_review_comment(report: &ValidationReport, out: &mut String) {
    out.push_str("<!-- needs review: ");
    for (i, finding) in report.findings.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(&finding.kind.to_string());
        if let Some(line) = finding.line {
            out.push_str(&format!(" line {line}"));
        }
    }
    out.push_str(" -->\n");
}

fn render_section(section: &Section, out: &mut String) {
    let slug = section.slug();
    if slug.is_empty() {
        out.push_str("<section>\n");
    } else {
        out.push_str("<section id=\"");
        out.push_str(&escape_html(&slug));
        out.push_str("\">\n");
    }

    if !section.title.is_empty() {
        let level = section.level.clamp(1, 6);
        out.push_str(&format!(
            "<h{level}>{}</h{level}>\n",
            escape_html(&section.title)
        ));
    }

    render_blocks(&section.blocks, out);
    for child in &section.children {
        render_section(child, out);
    }

    out.push_str("</section>\n");
}

fn render_blocks(blocks: &[Block], out: &mut String) {
    for block in blocks {
        match block {
            Block::Prose(text) => {
                let parser = Parser::new_ext(text, markdown_options());
                html::push_html(out, parser);
            }
            Block::Code { language, text, .. } => {
                out.push_str("<pre><code");
                if let Some(language) = language {
                    out.push_str(" class=\"language-");
                    out.push_str(&escape_html(language));
                    out.push('"');
                }
                out.push('>');
                out.push_str(&escape_html(text));
                out.push_str("\n</code></pre>\n");
            }
        }
    }
}

/// Escape text for HTML element and attribute contexts.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ============================================================================
// Tests
// ============================================================================
