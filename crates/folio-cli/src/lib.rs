//! The Folio command-line interface and build pipeline.
//!
//! # Modules
//!
//! - [`cli`]: clap argument definitions
//! - [`config`]: TOML/env configuration loading
//! - [`app`]: the application and command dispatch
//! - [`pipeline`]: the concurrent build pipeline
//! - [`config_handlers`], [`search_handlers`]: subcommand handlers

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod pipeline;
pub mod search_handlers;

// Re-export the types a binary needs
pub use app::FolioApp;
pub use cli::{BaseCommand, CliArgs};
pub use config::FolioConfig;
pub use pipeline::{run_build, run_validate, BuildOptions, BuildReport, FileOutcome, FileStatus};
