//! Configuration for the Folio CLI.
//!
//! Provides [`FolioConfig`], loaded from TOML files, environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FOLIO_CONFIG` environment variable
//! 3. XDG default: `~/.config/folio/config.toml`
//! 4. Built-in defaults

use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use folio_core::traits::ConfigProvider;
use folio_core::util::paths::expand_tilde;
use folio_core::{Error, Result};
use folio_index::SearchConfig;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Folio CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Project name, used for env var prefixes and the catalog title.
    pub project_name: String,

    /// Content root configuration.
    pub content: ContentConfig,

    /// Site output configuration.
    pub site: SiteConfig,

    /// Build pipeline configuration.
    pub build: BuildConfig,

    /// Search index configuration.
    pub index: SearchConfig,

    /// Rendering configuration.
    pub render: RenderConfig,
}

/// Content root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Path to the markdown corpus.
    pub path: Option<String>,
}

/// Site output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Output directory for generated pages and indexes.
    pub path: Option<String>,

    /// Catalog page title (defaults to the project name).
    pub title: Option<String>,
}

/// Build pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Concurrent document workers (0 = one per available core).
    pub jobs: usize,

    /// Per-document processing timeout in seconds.
    pub timeout_secs: u64,

    /// Treat validation findings as build failures.
    pub strict: bool,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Embed validation findings as HTML review comments.
    pub review_comments: bool,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            project_name: "folio".to_string(),
            content: ContentConfig::default(),
            site: SiteConfig::default(),
            build: BuildConfig::default(),
            index: SearchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: 0,
            timeout_secs: 30,
            strict: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            review_comments: true,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl FolioConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `FOLIO_CONFIG` env var
    /// 3. XDG default: `~/.config/folio/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("FOLIO");
        env_opts.add_section("content");
        env_opts.add_section("site");
        env_opts.add_section("build");
        env_opts.add_section("index");
        env_opts.add_section("render");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG
    /// default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("FOLIO_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
    }

    /// Catalog page title.
    pub fn site_title(&self) -> String {
        self.site
            .title
            .clone()
            .unwrap_or_else(|| self.project_name.clone())
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `FOLIO_`
    /// prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "FOLIO", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for FolioConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn content_root(&self) -> Result<PathBuf> {
        match &self.content.path {
            Some(p) => Ok(expand_tilde(p)),
            None => std::env::current_dir()
                .map(|d| d.join("docs"))
                .map_err(|e| Error::config(format!("Could not determine content root: {e}"))),
        }
    }

    fn output_root(&self) -> Result<PathBuf> {
        match &self.site.path {
            Some(p) => Ok(expand_tilde(p)),
            None => std::env::current_dir()
                .map(|d| d.join("site"))
                .map_err(|e| Error::config(format!("Could not determine output root: {e}"))),
        }
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => {
            out.push((prefix.to_string(), s.clone()));
        }
        toml::Value::Integer(i) => {
            out.push((prefix.to_string(), i.to_string()));
        }
        toml::Value::Float(f) => {
            out.push((prefix.to_string(), f.to_string()));
        }
        toml::Value::Boolean(b) => {
            out.push((prefix.to_string(), b.to_string()));
        }
        toml::Value::Datetime(dt) => {
            out.push((prefix.to_string(), dt.to_string()));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
