//! Corpus loading: discover markdown files under a content root and read
//! them into [`RawDocument`]s.
//!
//! Discovery is restartable (every call re-scans the filesystem) and
//! deterministic (results ordered by relative path). An unreadable
//! individual file is recorded as a per-file failure and skipped; only an
//! unusable content root aborts the load.

use std::path::{Path, PathBuf};

use folio_core::util::files::{self, FindOptions};
use folio_core::{Error, Result};

use crate::document::RawDocument;

/// A file that could not be read during corpus loading.
#[derive(Debug)]
pub struct LoadFailure {
    /// Path of the offending file.
    pub path: PathBuf,
    /// Path relative to the content root.
    pub relative_path: PathBuf,
    /// The I/O error that occurred.
    pub error: Error,
}

/// The result of scanning a content root.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    /// Successfully read documents, ordered by relative path.
    pub documents: Vec<RawDocument>,
    /// Files that could not be read.
    pub failures: Vec<LoadFailure>,
}

impl LoadedCorpus {
    /// Total number of files the scan found.
    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }
}

/// Load every markdown file under `root`.
///
/// # Errors
///
/// Fails when `root` does not exist or is not a directory. An empty root
/// yields an empty corpus, not an error.
pub async fn load_corpus(root: &Path) -> Result<LoadedCorpus> {
    if !files::exists(root).await {
        return Err(Error::not_found(
            "Content root",
            root.display().to_string(),
        ));
    }
    if !root.is_dir() {
        return Err(Error::invalid_data(format!(
            "content root {} is not a directory",
            root.display()
        )));
    }

    let found = files::find_all_files(root, FindOptions::markdown()).await?;
    let mut corpus = LoadedCorpus::default();

    for info in found {
        match files::read_file(&info.path).await {
            Ok(text) => corpus.documents.push(RawDocument {
                path: info.path,
                relative_path: info.relative_path,
                text,
            }),
            Err(error) => {
                log::warn!("skipping unreadable file {}: {error}", info.path.display());
                corpus.failures.push(LoadFailure {
                    path: info.path,
                    relative_path: info.relative_path,
                    error,
                });
            }
        }
    }

    log::info!(
        "loaded {} document(s) from {} ({} unreadable)",
        corpus.documents.len(),
        root.display(),
        corpus.failures.len()
    );

    Ok(corpus)
}
