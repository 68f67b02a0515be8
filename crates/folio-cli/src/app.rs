//! The Folio CLI application: logging setup and command dispatch.

use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use folio_core::util::files::{count_files, FindOptions};
use folio_core::{AppState, ConfigProvider, Result};
use folio_render::RenderOptions;

use crate::cli::{BaseCommand, BuildArgs, CliArgs, SearchArgs, ValidateArgs};
use crate::config::FolioConfig;
use crate::config_handlers;
use crate::pipeline::{run_build, run_validate, BuildOptions, BuildReport, FileStatus};
use crate::search_handlers::{handle_search, SearchMode, SearchOptions};

// ============================================================================
// FolioApp
// ============================================================================

/// The CLI application.
pub struct FolioApp {
    name: String,
    state: AppState<FolioConfig>,
    version: String,
}

impl FolioApp {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FolioConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new application with an already-loaded configuration.
    pub fn new(name: impl Into<String>, config: FolioConfig) -> Self {
        Self {
            name: name.into(),
            state: AppState::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &FolioConfig {
        self.state.config()
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on
    /// verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments; returns the process exit code.
    pub async fn run(&self, args: CliArgs) -> Result<i32> {
        self.init_logging(args.verbose, args.quiet);
        tracing::debug!(command = ?args.command, "dispatching");

        match args.command {
            Some(BaseCommand::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(0)
            }
            Some(BaseCommand::Health) => self.handle_health().await,
            Some(BaseCommand::Build(build)) => self.handle_build(build).await,
            Some(BaseCommand::Validate(validate)) => self.handle_validate(validate).await,
            Some(BaseCommand::Search(search)) => self.handle_search(search).await,
            Some(BaseCommand::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)?;
                Ok(0)
            }
            None => {
                println!("{} {} — use --help for usage", self.name, self.version);
                Ok(0)
            }
        }
    }

    async fn handle_health(&self) -> Result<i32> {
        let content_root = self.config().content_root()?;
        if content_root.is_dir() {
            let count = count_files(&content_root, FindOptions::markdown()).await?;
            println!(
                "{}: healthy ({} document(s) under {})",
                self.name,
                count,
                content_root.display()
            );
            Ok(0)
        } else {
            println!(
                "{}: content root {} is missing",
                self.name,
                content_root.display()
            );
            Ok(1)
        }
    }

    async fn handle_build(&self, args: BuildArgs) -> Result<i32> {
        let options = self.build_options(
            args.input,
            args.output,
            args.strict,
            args.jobs,
            args.timeout_secs,
        )?;
        let report = run_build(options).await?;
        print_report(&report);
        Ok(report.exit_code())
    }

    async fn handle_validate(&self, args: ValidateArgs) -> Result<i32> {
        let options = self.build_options(args.input, None, args.strict, None, None)?;
        let report = run_validate(options).await?;
        print_report(&report);
        Ok(report.exit_code())
    }

    async fn handle_search(&self, args: SearchArgs) -> Result<i32> {
        let site_root = match args.index {
            Some(path) => PathBuf::from(path),
            None => self.config().output_root()?,
        };
        let mode = if args.exact {
            SearchMode::Exact
        } else if args.prefix {
            SearchMode::Prefix
        } else {
            SearchMode::FullText
        };

        handle_search(
            &self.config().index,
            SearchOptions {
                site_root,
                query: args.query,
                limit: args.limit,
                category: args.category,
                mode,
            },
        )
        .await?;
        Ok(0)
    }

    fn build_options(
        &self,
        input: Option<String>,
        output: Option<String>,
        strict: bool,
        jobs: Option<usize>,
        timeout_secs: Option<u64>,
    ) -> Result<BuildOptions> {
        let input = match input {
            Some(path) => PathBuf::from(path),
            None => self.config().content_root()?,
        };
        let output = match output {
            Some(path) => PathBuf::from(path),
            None => self.config().output_root()?,
        };

        Ok(BuildOptions {
            input,
            output,
            strict: strict || self.config().build.strict,
            jobs: jobs.unwrap_or(self.config().build.jobs),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(self.config().build.timeout_secs)),
            render: RenderOptions {
                review_comments: self.config().render.review_comments,
            },
            site_title: self.config().site_title(),
            full_text_index: cfg!(feature = "search-tantivy"),
        })
    }
}

/// Print the per-file build log and summary.
fn print_report(report: &BuildReport) {
    for file in &report.files {
        match file.status {
            FileStatus::Ok => println!("ok          {}", file.path),
            FileStatus::Findings => {
                println!("findings    {} ({})", file.path, file.findings.len());
            }
            FileStatus::ParseFailed => println!(
                "parse-error {} ({})",
                file.path,
                file.error.as_deref().unwrap_or("unknown")
            ),
            FileStatus::IoFailed => println!(
                "io-error    {} ({})",
                file.path,
                file.error.as_deref().unwrap_or("unknown")
            ),
            FileStatus::TimedOut => println!(
                "timeout     {} ({})",
                file.path,
                file.error.as_deref().unwrap_or("unknown")
            ),
        }
        for finding in &file.findings {
            match finding.line {
                Some(line) => println!("  - {} (line {}): {}", finding.kind, line, finding.message),
                None => println!("  - {}: {}", finding.kind, finding.message),
            }
        }
    }
    println!("{}", report.summary());
}

// ============================================================================
// Tests
// ============================================================================
