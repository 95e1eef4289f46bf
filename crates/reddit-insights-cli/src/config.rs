//! Configuration file handling for reddit-insights

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key (prefer the environment variable on shared machines)
    pub api_key: Option<String>,
    /// API origin override
    pub base_url: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Fails only when the config directory cannot be determined; a broken
    /// file is reported and ignored.
    pub fn load() -> Result<Self> {
        Ok(Self::load_or_default(&Self::config_path()?))
    }

    /// Load `path`, or defaults when it is missing or cannot be parsed
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Ignoring config file: {:#}", e);
            Self::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("reddit-insights");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments (already resolved against env vars) over file values
    pub fn merge_with_args(&self, args: ArgOverrides<'_>) -> Result<MergedConfig> {
        let api_key = args
            .api_key
            .map(String::from)
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.is_empty());
        let Some(api_key) = api_key else {
            bail!(
                "No API key configured. Pass --api-key, set REDDIT_INSIGHTS_API_KEY, \
                 or add api_key to the config file"
            );
        };

        Ok(MergedConfig {
            api_key,
            base_url: args
                .base_url
                .map(String::from)
                .or_else(|| self.base_url.clone()),
            timeout_ms: args.timeout_ms.or(self.timeout_ms),
            output: args
                .output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "table".to_string()),
            no_color: args.no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Values given on the command line or through environment variables
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgOverrides<'a> {
    pub api_key: Option<&'a str>,
    pub base_url: Option<&'a str>,
    pub timeout_ms: Option<u64>,
    pub output: Option<&'a str>,
    pub no_color: bool,
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub output: String,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_args_override_file() {
        let file = Config {
            api_key: Some("file-key".to_string()),
            base_url: Some("https://file.example".to_string()),
            timeout_ms: Some(1000),
            output: Some("json".to_string()),
            no_color: None,
        };
        let merged = file
            .merge_with_args(ArgOverrides {
                api_key: Some("cli-key"),
                timeout_ms: Some(5000),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.api_key, "cli-key");
        assert_eq!(merged.base_url.as_deref(), Some("https://file.example"));
        assert_eq!(merged.timeout_ms, Some(5000));
        assert_eq!(merged.output, "json");
        assert!(!merged.no_color);
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let err = Config::default()
            .merge_with_args(ArgOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"k\"\nbase_url = \"http://localhost:3000\"\ntimeout_ms = 2500").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.timeout_ms, Some(2500));
        assert!(config.output.is_none());
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = \"soon\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_or_default_ignores_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = [").unwrap();

        let config = Config::load_or_default(file.path());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml"));
        assert!(config.api_key.is_none());

        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"k\"\n").unwrap();
        assert_eq!(Config::load_or_default(&path).api_key.as_deref(), Some("k"));
    }
}
