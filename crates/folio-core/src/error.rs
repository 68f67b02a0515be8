//! Error types for Folio operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Folio crates. Uses `thiserror` for derive macros.
//!
//! Per-file failures (I/O, parse) carry enough context to be reported in the
//! build log without aborting a corpus build.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur in Folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the path that produced it.
    #[error("I/O error at {path}: {source}")]
    IoPath {
        /// Path being accessed when the error occurred.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Malformed markdown structure, with the source location.
    #[error("parse error in {path} at line {line}: {message}")]
    Parse {
        /// Document path.
        path: String,
        /// 1-based source line where parsing failed.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of thing was looked up.
        kind: String,
        /// The identifier that missed.
        id: String,
    },

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A backend operation failed.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error without path context.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Wrap an I/O error with the path being accessed.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().display().to_string(),
            source: err,
        }
    }

    /// Create a parse error carrying a source location.
    pub fn parse(path: impl AsRef<Path>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().display().to_string(),
            line,
            message: message.into(),
        }
    }

    /// True for per-file I/O failures (the build skips the file).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::IoPath { .. })
    }

    /// True for parse failures (the build reports the file as failed).
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Result type alias using Folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("bad section");
        assert_eq!(err.to_string(), "Configuration error: bad section");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("Document", "intro");
        assert_eq!(err.to_string(), "Document not found: intro");
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = Error::parse("docs/intro.md", 42, "unterminated code fence");
        let msg = err.to_string();
        assert!(msg.contains("docs/intro.md"));
        assert!(msg.contains("line 42"));
        assert!(msg.contains("unterminated code fence"));
        assert!(err.is_parse());
        assert!(!err.is_io());
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io_with_path(io, "docs/locked.md");
        assert!(err.to_string().contains("docs/locked.md"));
        assert!(err.is_io());
    }

    #[test]
    fn test_io_from_conversion() {
        fn fails() -> Result<()> {
            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
            Err(Error::from(io))
        }
        assert!(fails().unwrap_err().is_io());
    }
}
