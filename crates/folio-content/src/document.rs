//! The document model: Document, Section, Block, and frontmatter metadata.
//!
//! A `Document` is one parsed markdown file. Its body is a forest of
//! `Section`s nested by heading level; each section owns the `Block`s
//! (prose runs and code blocks) that follow its heading. Everything here is
//! immutable after parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A discovered markdown file before parsing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Full path to the file.
    pub path: PathBuf,
    /// Path relative to the content root.
    pub relative_path: PathBuf,
    /// Raw source text.
    pub text: String,
}

impl RawDocument {
    /// Stable identifier derived from the relative path.
    pub fn id(&self) -> String {
        id_from_relative_path(&self.relative_path)
    }
}

/// Optional YAML frontmatter metadata.
///
/// Unknown keys are ignored; every field is optional because this corpus
/// mostly ships without frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocMeta {
    /// Display title override (used only when the body has no H1).
    pub title: Option<String>,
    /// Short description for catalog listings.
    pub description: Option<String>,
    /// Topic category.
    pub category: Option<String>,
    /// Search tags.
    pub tags: Vec<String>,
}

/// A body block: either a run of prose markdown or a code block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Raw markdown covering paragraphs, lists, tables, quotes.
    Prose(String),
    /// A fenced or indented code block. Never executed.
    Code {
        /// Declared language tag, if any.
        language: Option<String>,
        /// Literal code text, without the trailing newline.
        text: String,
        /// 1-based source line of the opening fence.
        line: usize,
    },
}

/// A heading plus its owned body content, nested by heading level.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Heading level (1–6).
    pub level: u8,
    /// Heading text. Empty only for the synthetic root of a heading-less
    /// document.
    pub title: String,
    /// 1-based source line of the heading.
    pub line: usize,
    /// Body blocks between this heading and the next.
    pub blocks: Vec<Block>,
    /// Subsections.
    pub children: Vec<Section>,
}

impl Section {
    /// Anchor slug for this section's heading.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Number of section nodes in this subtree (including self).
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Section::subtree_len).sum::<usize>()
    }
}

/// One parsed markdown file.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier derived from the relative path.
    pub id: String,
    /// Full path to the source file.
    pub path: PathBuf,
    /// Path relative to the content root.
    pub relative_path: PathBuf,
    /// First H1 text; empty when the document has none.
    pub title: String,
    /// Frontmatter metadata, when present.
    pub meta: Option<DocMeta>,
    /// Body content appearing before the first heading.
    pub preamble: Vec<Block>,
    /// Root sections.
    pub sections: Vec<Section>,
    /// Raw source text.
    pub source: String,
}

impl Document {
    /// Title for catalog and search listings: the first H1, falling back to
    /// frontmatter, then to the file stem.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        if let Some(meta) = &self.meta {
            if let Some(title) = &meta.title {
                if !title.is_empty() {
                    return title.clone();
                }
            }
        }
        self.relative_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.id)
            .to_string()
    }

    /// Topic category: frontmatter wins, else the first directory component
    /// of the relative path.
    pub fn category(&self) -> Option<String> {
        if let Some(meta) = &self.meta {
            if let Some(cat) = &meta.category {
                return Some(slugify(cat));
            }
        }
        let mut components = self.relative_path.components();
        let first = components.next()?;
        // A bare filename has no directory component.
        components.next()?;
        first.as_os_str().to_str().map(slugify)
    }

    /// Pre-order traversal over all sections.
    pub fn iter_sections(&self) -> SectionIter<'_> {
        SectionIter::new(&self.sections)
    }

    /// Total number of section nodes.
    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::subtree_len).sum()
    }

    /// All code blocks in source order, with the slug of their owning
    /// section (empty slug for preamble code).
    pub fn code_blocks(&self) -> Vec<(&Block, String)> {
        let mut out = Vec::new();
        for block in &self.preamble {
            if matches!(block, Block::Code { .. }) {
                out.push((block, String::new()));
            }
        }
        for section in self.iter_sections() {
            for block in &section.blocks {
                if matches!(block, Block::Code { .. }) {
                    out.push((block, section.slug()));
                }
            }
        }
        out
    }

    /// Re-serialize the section tree to markdown.
    ///
    /// Structure round-trips: heading text and nesting order are preserved,
    /// though blank-line formatting may differ from the source.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        blocks_to_markdown(&self.preamble, &mut out);
        for section in &self.sections {
            section_to_markdown(section, &mut out);
        }
        out
    }
}

/// Pre-order iterator over a section forest.
pub struct SectionIter<'a> {
    stack: Vec<&'a Section>,
}

impl<'a> SectionIter<'a> {
    fn new(roots: &'a [Section]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for SectionIter<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.stack.pop()?;
        self.stack.extend(section.children.iter().rev());
        Some(section)
    }
}

fn section_to_markdown(section: &Section, out: &mut String) {
    if !section.title.is_empty() {
        for _ in 0..section.level {
            out.push('#');
        }
        out.push(' ');
        out.push_str(&section.title);
        out.push_str("\n\n");
    }
    blocks_to_markdown(&section.blocks, out);
    for child in &section.children {
        section_to_markdown(child, out);
    }
}

fn blocks_to_markdown(blocks: &[Block], out: &mut String) {
    for block in blocks {
        match block {
            Block::Prose(text) => {
                out.push_str(text.trim_end());
                out.push_str("\n\n");
            }
            Block::Code { language, text, .. } => {
                out.push_str("```");
                if let Some(lang) = language {
                    out.push_str(lang);
                }
                out.push('\n');
                out.push_str(text);
                out.push_str("\n```\n\n");
            }
        }
    }
}

/// Normalize text into a lowercase, dash-separated slug.
///
/// Alphanumeric runs are kept, everything else collapses into single
/// dashes; leading and trailing dashes are trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Derive a document id from a content-root-relative path.
///
/// Components are slugified and joined with `/`; the `.md` extension is
/// dropped: `Docker/Intro Guide.md` → `docker/intro-guide`.
pub fn id_from_relative_path(path: &Path) -> String {
    let without_ext = path.with_extension("");
    let parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect();
    parts.join("/")
}
