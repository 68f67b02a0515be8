//! Search configuration types shared by the backends.

use serde::{Deserialize, Serialize};

/// How multiple query terms combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// AND for 1–2 terms, OR for longer queries.
    #[default]
    Smart,
    /// All terms must match.
    And,
    /// Any term can match.
    Or,
}

/// Full-text search configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Directory holding the search index.
    pub index_path: Option<String>,
    /// Result limit when the caller does not specify one.
    pub default_limit: usize,
    /// Maximum snippet length in bytes.
    pub snippet_length: usize,
    /// Term combination mode.
    pub query_mode: QueryMode,
    /// Enable fuzzy matching for terms of 4+ characters.
    pub fuzzy_enabled: bool,
    /// Maximum edit distance for fuzzy matches.
    pub fuzzy_distance: u8,
    /// Drop English stopwords from queries.
    pub filter_stopwords: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            default_limit: 10,
            snippet_length: 160,
            query_mode: QueryMode::Smart,
            fuzzy_enabled: false,
            fuzzy_distance: 1,
            filter_stopwords: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.snippet_length, 160);
        assert_eq!(config.query_mode, QueryMode::Smart);
        assert!(!config.fuzzy_enabled);
        assert!(config.filter_stopwords);
    }

    #[test]
    fn test_search_config_from_toml_fragment() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"query_mode": "and", "default_limit": 5}"#).unwrap();
        assert_eq!(config.query_mode, QueryMode::And);
        assert_eq!(config.default_limit, 5);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.snippet_length, 160);
    }
}
