//! Core traits for Folio pipeline configuration.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where a Folio
//! application finds its content and where it writes its output. The CLI
//! crate provides a TOML/env-backed implementation; tests use small inline
//! ones.

use std::path::PathBuf;

use crate::Result;

/// Trait for pipeline configuration.
///
/// Every Folio-based application implements this trait to tell the pipeline
/// crates where the markdown corpus lives and where generated artifacts go.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across worker tasks
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use folio_core::traits::ConfigProvider;
/// use folio_core::Result;
///
/// #[derive(Clone)]
/// struct TutorialConfig {
///     content: PathBuf,
///     site: PathBuf,
/// }
///
/// impl ConfigProvider for TutorialConfig {
///     fn project_name(&self) -> &str {
///         "tutorials"
///     }
///
///     fn content_root(&self) -> Result<PathBuf> {
///         Ok(self.content.clone())
///     }
///
///     fn output_root(&self) -> Result<PathBuf> {
///         Ok(self.site.clone())
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and log context.
    fn project_name(&self) -> &str;

    /// Root directory of the markdown corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined (e.g., missing
    /// environment variable or invalid configuration).
    fn content_root(&self) -> Result<PathBuf>;

    /// Root directory for generated output (site pages, index artifacts).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn output_root(&self) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        name: String,
        content: PathBuf,
        site: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            &self.name
        }

        fn content_root(&self) -> Result<PathBuf> {
            Ok(self.content.clone())
        }

        fn output_root(&self) -> Result<PathBuf> {
            Ok(self.site.clone())
        }
    }

    fn test_config() -> TestConfig {
        TestConfig {
            name: "test-docs".into(),
            content: PathBuf::from("/data/docs"),
            site: PathBuf::from("/data/site"),
        }
    }

    #[test]
    fn test_config_provider_project_name() {
        assert_eq!(test_config().project_name(), "test-docs");
    }

    #[test]
    fn test_config_provider_roots() {
        let config = test_config();
        assert_eq!(config.content_root().unwrap(), PathBuf::from("/data/docs"));
        assert_eq!(config.output_root().unwrap(), PathBuf::from("/data/site"));
    }

    #[test]
    fn test_config_provider_is_clone() {
        let config = test_config();
        let cloned = config.clone();
        assert_eq!(config.project_name(), cloned.project_name());
    }

    #[test]
    fn test_config_provider_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestConfig>();
    }
}
