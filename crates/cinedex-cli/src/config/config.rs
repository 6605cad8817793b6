//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result};
use cinedex_api::tmdb::MediaKind;
use serde::{Deserialize, Serialize};

/// Default TMDB response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Browse defaults.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// TMDB access configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API read access token. `TMDB_API_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Response language (e.g. `en-US`, `ja-JP`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Alternate API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            language: default_language(),
            base_url: None,
        }
    }
}

/// Browse defaults.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Media kind used when `--kind` is omitted.
    #[serde(default = "default_kind")]
    pub default_kind: MediaKind,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
        }
    }
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

const fn default_kind() -> MediaKind {
    MediaKind::Movie
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Picks the API token: a non-blank `env_token` wins over the file.
    #[must_use]
    pub fn api_token(&self, env_token: Option<String>) -> Option<String> {
        env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.tmdb.api_token.clone())
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.api_token.is_none());
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.browse.default_kind, MediaKind::Movie);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_token: Some(String::from("token")),
                language: String::from("ja-JP"),
                base_url: Some(String::from("http://localhost:8080/3/")),
            },
            browse: BrowseConfig {
                default_kind: MediaKind::Tv,
            },
        };

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Assert
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\ndefault_kind = \"tv\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.browse.default_kind, MediaKind::Tv);
        assert_eq!(config.tmdb, TmdbConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_env_token_overrides_file() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.api_token = Some(String::from("from-file"));

        // Act & Assert
        assert_eq!(
            config.api_token(Some(String::from("from-env"))).as_deref(),
            Some("from-env")
        );
        assert_eq!(config.api_token(Some(String::from("  "))).as_deref(), Some("from-file"));
        assert_eq!(config.api_token(None).as_deref(), Some("from-file"));
    }

    #[test]
    fn test_blank_tokens_are_missing() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.api_token = Some(String::new());

        // Act & Assert
        assert!(config.api_token(None).is_none());
    }
}
