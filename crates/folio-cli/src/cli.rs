//! CLI argument parsing and command definitions.
//!
//! Provides the `folio` command tree: the build/validate pipeline entry
//! points, index queries, and configuration management.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Build the site and search index from a markdown corpus.
    Build(BuildArgs),

    /// Parse and validate the corpus without writing output.
    Validate(ValidateArgs),

    /// Query the built search index.
    Search(SearchArgs),

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,

    /// Check that the configured content root is usable.
    Health,
}

/// Arguments for the build command.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Content root holding the markdown corpus.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output directory for the generated site.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Treat validation findings as build failures (exit code 2).
    #[arg(long)]
    pub strict: bool,

    /// Number of concurrent document workers (0 = auto).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Per-document processing timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the validate command.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Content root holding the markdown corpus.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Enable strict-only checks and exit code 2 on findings.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the search command.
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// The search query.
    pub query: String,

    /// Site directory holding the built indexes (defaults to the
    /// configured output root).
    #[arg(short, long)]
    pub index: Option<String>,

    /// Maximum number of results.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Restrict results to one category.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Exact token lookup against the cross-reference index.
    #[arg(long, conflicts_with = "prefix")]
    pub exact: bool,

    /// Prefix token lookup against the cross-reference index.
    #[arg(long, conflicts_with = "exact")]
    pub prefix: bool,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "build.jobs").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "build.jobs").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
