//! The build pipeline: parse, validate, render, and index a corpus.
//!
//! Documents are independent, so the pipeline fans out one tokio task per
//! document (bounded by a semaphore) and fans back in only to merge the
//! per-document partial cross-reference indexes and write the shared
//! artifacts. A bounded per-document timeout excludes the offending
//! document from the corpus and reports it; nothing is retried.
//!
//! Per-file failures never abort the build. Only the exit-code policy
//! distinguishes them: parse failures map to exit 1, validation findings to
//! exit 2 under `--strict`, and I/O failures and timeouts are reported
//! without affecting the exit code.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use folio_content::{
    load_corpus, parse_document, validate_document, Document, Finding, RawDocument,
    ValidateOptions,
};
use folio_core::{Error, Result};
use folio_index::XrefIndex;
use folio_render::{
    output_page_path, page_href, render_catalog, render_document, RenderOptions,
    CATALOG_FILENAME, SEARCH_INDEX_FILENAME,
};

#[cfg(feature = "search-tantivy")]
use folio_index::{Indexer, SearchDocument, SearchSchema};
#[cfg(feature = "search-tantivy")]
use folio_render::SEARCH_INDEX_DIR;

// ============================================================================
// Options and report types
// ============================================================================

/// Options for one pipeline run.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Content root holding the markdown corpus.
    pub input: PathBuf,
    /// Output directory for the generated site.
    pub output: PathBuf,
    /// Strict mode: extra checks, findings fail the build (exit 2).
    pub strict: bool,
    /// Concurrent document workers (0 = one per available core).
    pub jobs: usize,
    /// Per-document processing timeout.
    pub timeout: Duration,
    /// Rendering options.
    pub render: RenderOptions,
    /// Catalog page title.
    pub site_title: String,
    /// Also build the full-text search index (needs the `search-tantivy`
    /// feature to have any effect).
    pub full_text_index: bool,
}

/// Outcome category for one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Parsed, validated clean, rendered.
    Ok,
    /// Built, but validation reported findings.
    Findings,
    /// Malformed beyond recovery; excluded from the corpus.
    ParseFailed,
    /// Could not be read or written; excluded from the corpus.
    IoFailed,
    /// Exceeded the per-document timeout; excluded from the corpus.
    TimedOut,
}

/// Per-file result line of the build log.
#[derive(Clone, Debug, Serialize)]
pub struct FileOutcome {
    /// Content-root-relative path.
    pub path: String,
    /// Outcome category.
    pub status: FileStatus,
    /// Error text for failed files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Validation findings for built files.
    pub findings: Vec<Finding>,
}

impl FileOutcome {
    fn failed(path: String, status: FileStatus, error: String) -> Self {
        Self {
            path,
            status,
            error: Some(error),
            findings: Vec::new(),
        }
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Serialize)]
pub struct BuildReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Whether strict mode was on.
    pub strict: bool,
    /// Documents parsed, validated, and rendered.
    pub documents_built: usize,
    /// Files with fatal parse errors.
    pub parse_failures: usize,
    /// Files that could not be read or written.
    pub io_failures: usize,
    /// Files excluded by the per-document timeout.
    pub timeouts: usize,
    /// Validation findings across all built documents.
    pub total_findings: usize,
    /// Per-file outcomes, ordered by path.
    pub files: Vec<FileOutcome>,
}

impl BuildReport {
    /// Exit code for this run: 1 for any parse failure, 2 for findings
    /// under strict mode, 0 otherwise. I/O failures and timeouts are
    /// reported but do not affect the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.parse_failures > 0 {
            1
        } else if self.strict && self.total_findings > 0 {
            2
        } else {
            0
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "{} built, {} finding(s), {} parse failure(s), {} unreadable, {} timed out",
            self.documents_built,
            self.total_findings,
            self.parse_failures,
            self.io_failures,
            self.timeouts
        )
    }
}

// ============================================================================
// Pipeline entry points
// ============================================================================

/// Build the site: parse, validate, render, and index the corpus.
pub async fn run_build(options: BuildOptions) -> Result<BuildReport> {
    run_pipeline(options, true).await
}

/// Validate only: parse and validate the corpus, writing nothing.
pub async fn run_validate(options: BuildOptions) -> Result<BuildReport> {
    run_pipeline(options, false).await
}

// ============================================================================
// Internals
// ============================================================================

struct WorkerContext {
    output: PathBuf,
    strict: bool,
    render: RenderOptions,
    write: bool,
}

struct BuiltDoc {
    partial: XrefIndex,
    catalog_entry: (String, String, Option<String>),
    document: Document,
}

struct DocOutput {
    outcome: FileOutcome,
    built: Option<Box<BuiltDoc>>,
}

async fn run_pipeline(options: BuildOptions, write: bool) -> Result<BuildReport> {
    let started_at = Utc::now();
    let corpus = load_corpus(&options.input).await?;

    let mut outcomes: Vec<FileOutcome> = corpus
        .failures
        .iter()
        .map(|f| {
            FileOutcome::failed(
                f.relative_path.display().to_string(),
                FileStatus::IoFailed,
                f.error.to_string(),
            )
        })
        .collect();

    let jobs = if options.jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        options.jobs
    };

    let context = Arc::new(WorkerContext {
        output: options.output.clone(),
        strict: options.strict,
        render: options.render,
        write,
    });
    let semaphore = Arc::new(Semaphore::new(jobs));
    let timeout = options.timeout;

    let mut set: JoinSet<DocOutput> = JoinSet::new();
    for raw in corpus.documents {
        let context = Arc::clone(&context);
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let path = raw.relative_path.display().to_string();
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return DocOutput {
                        outcome: FileOutcome::failed(
                            path,
                            FileStatus::IoFailed,
                            "worker pool shut down".to_string(),
                        ),
                        built: None,
                    };
                }
            };

            match tokio::time::timeout(timeout, process_document(raw, &context)).await {
                Ok(output) => output,
                Err(_) => DocOutput {
                    outcome: FileOutcome::failed(
                        path,
                        FileStatus::TimedOut,
                        format!("processing exceeded {}s", timeout.as_secs_f64()),
                    ),
                    built: None,
                },
            }
        });
    }

    // Fan-in barrier: every partial index must arrive before the merged
    // index is published.
    let mut xref = XrefIndex::new();
    let mut catalog_entries: Vec<(String, String, Option<String>)> = Vec::new();
    let mut built_documents: Vec<Document> = Vec::new();

    while let Some(joined) = set.join_next().await {
        let output = joined.map_err(|e| Error::operation(format!("worker task failed: {e}")))?;
        if let Some(built) = output.built {
            let BuiltDoc {
                partial,
                catalog_entry,
                document,
            } = *built;
            xref.merge(partial);
            catalog_entries.push(catalog_entry);
            built_documents.push(document);
        }
        outcomes.push(output.outcome);
    }

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    catalog_entries.sort();

    if write {
        write_site_artifacts(&options, &xref, &catalog_entries).await?;

        #[cfg(feature = "search-tantivy")]
        if options.full_text_index {
            built_documents.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
            build_full_text_index(&options.output, &built_documents)?;
        }
    }

    let report = BuildReport {
        started_at,
        strict: options.strict,
        documents_built: built_documents.len(),
        parse_failures: count_status(&outcomes, FileStatus::ParseFailed),
        io_failures: count_status(&outcomes, FileStatus::IoFailed),
        timeouts: count_status(&outcomes, FileStatus::TimedOut),
        total_findings: outcomes.iter().map(|o| o.findings.len()).sum(),
        files: outcomes,
    };

    log::info!("pipeline finished: {}", report.summary());
    Ok(report)
}

async fn process_document(raw: RawDocument, context: &WorkerContext) -> DocOutput {
    let path = raw.relative_path.display().to_string();

    let document = match parse_document(&raw) {
        Ok(document) => document,
        Err(error) => {
            return DocOutput {
                outcome: FileOutcome::failed(path, FileStatus::ParseFailed, error.to_string()),
                built: None,
            };
        }
    };

    let report = validate_document(
        &document,
        ValidateOptions {
            strict: context.strict,
        },
    );

    if context.write {
        let html = render_document(&document, Some(&report), &context.render);
        let page_path = output_page_path(&context.output, &raw.relative_path);
        if let Err(error) = write_page(&page_path, &html).await {
            return DocOutput {
                outcome: FileOutcome::failed(path, FileStatus::IoFailed, error.to_string()),
                built: None,
            };
        }
    }

    let mut partial = XrefIndex::new();
    partial.add_document(&document);

    let catalog_entry = (
        page_href(&raw.relative_path),
        document.display_title(),
        document.category(),
    );

    let status = if report.is_clean() {
        FileStatus::Ok
    } else {
        FileStatus::Findings
    };

    DocOutput {
        outcome: FileOutcome {
            path,
            status,
            error: None,
            findings: report.findings,
        },
        built: Some(Box::new(BuiltDoc {
            partial,
            catalog_entry,
            document,
        })),
    }
}

async fn write_page(page_path: &std::path::Path, html: &str) -> Result<()> {
    if let Some(parent) = page_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(e, parent))?;
    }
    tokio::fs::write(page_path, html)
        .await
        .map_err(|e| Error::io_with_path(e, page_path))
}

async fn write_site_artifacts(
    options: &BuildOptions,
    xref: &XrefIndex,
    catalog_entries: &[(String, String, Option<String>)],
) -> Result<()> {
    tokio::fs::create_dir_all(&options.output)
        .await
        .map_err(|e| Error::io_with_path(e, &options.output))?;

    let index_path = options.output.join(SEARCH_INDEX_FILENAME);
    tokio::fs::write(&index_path, xref.to_json()?)
        .await
        .map_err(|e| Error::io_with_path(e, &index_path))?;

    let catalog = render_catalog(&options.site_title, catalog_entries);
    let catalog_path = options.output.join(CATALOG_FILENAME);
    tokio::fs::write(&catalog_path, catalog)
        .await
        .map_err(|e| Error::io_with_path(e, &catalog_path))
}

#[cfg(feature = "search-tantivy")]
fn build_full_text_index(output: &std::path::Path, documents: &[Document]) -> Result<()> {
    let schema = SearchSchema::build();
    let index_dir = output.join(SEARCH_INDEX_DIR);
    let mut indexer = Indexer::new(&index_dir, &schema)?;
    for document in documents {
        indexer.add_document(&SearchDocument::from_document(document))?;
    }
    indexer.commit()
}

fn count_status(outcomes: &[FileOutcome], status: FileStatus) -> usize {
    outcomes.iter().filter(|o| o.status == status).count()
}

// ============================================================================
// Tests
// ============================================================================
