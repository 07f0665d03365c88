use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

const CONFIG_FILE: &str = "gh-run-logs.toml";

/// Application configuration loaded from gh-run-logs.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Root directory receiving one subdirectory per job
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    /// Where the downloaded log archive is stored
    #[serde(default = "default_archive_file")]
    pub archive_file: PathBuf,
    #[serde(default = "default_keep_archive")]
    pub keep_archive: bool,
    /// Conclusions that count as a failed run or job
    #[serde(default = "default_failed_conclusions")]
    pub failed_conclusions: Vec<String>,
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_archive_file() -> PathBuf {
    PathBuf::from("workflow_logs.zip")
}

fn default_keep_archive() -> bool {
    true
}

fn default_failed_conclusions() -> Vec<String> {
    vec!["failure".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
            archive_file: default_archive_file(),
            keep_archive: default_keep_archive(),
            failed_conclusions: default_failed_conclusions(),
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        // Try current directory first
        if let Some(config) = Self::read(PathBuf::from(CONFIG_FILE)) {
            return config;
        }

        // Try home directory
        if let Some(home) = env::var_os("HOME")
            && let Some(config) = Self::read(PathBuf::from(home).join(format!(".{}", CONFIG_FILE)))
        {
            return config;
        }

        debug!("Using default config");
        Self::default()
    }

    fn read(path: PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(&path).ok()?;
        match Self::from_toml(&content) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(err) => {
                warn!("Ignoring {}: {:#}", path.display(), err);
                None
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    /// Whether a run or job conclusion counts as failed
    pub fn is_failed(&self, conclusion: Option<&str>) -> bool {
        conclusion.is_some_and(|c| self.failed_conclusions.iter().any(|f| f == c))
    }
}

/// Credentials for the GitHub API
///
/// Built once at startup and handed to the client, so nothing past `main`
/// reads the process environment.
#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubConfig {
    /// Read GITHUB_TOKEN, loading a .env file first if it is not set
    pub fn from_env() -> Result<Self> {
        if env::var("GITHUB_TOKEN").is_err() {
            match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded .env file from: {:?}", path),
                Err(_) => debug!(".env file not found, will rely on environment variables"),
            }
        }

        let token = env::var("GITHUB_TOKEN").context(
            "GITHUB_TOKEN environment variable not set. Please set it or create a .env file.",
        )?;

        Ok(Self { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.archive_file, PathBuf::from("workflow_logs.zip"));
        assert!(config.keep_archive);
    }

    #[test]
    fn test_partial_overrides() {
        let config = Config::from_toml(
            r#"
            logs_dir = "ci-logs"
            failed_conclusions = ["failure", "timed_out"]
            "#,
        )
        .unwrap();

        assert_eq!(config.logs_dir, PathBuf::from("ci-logs"));
        assert_eq!(config.archive_file, PathBuf::from("workflow_logs.zip"));
        assert!(config.is_failed(Some("timed_out")));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::from_toml("logs_dir = [").is_err());
        assert!(Config::from_toml("keep_archive = \"yes\"").is_err());
    }

    #[test]
    fn test_is_failed() {
        let config = Config::default();
        assert!(config.is_failed(Some("failure")));
        assert!(!config.is_failed(Some("success")));
        assert!(!config.is_failed(Some("cancelled")));
        assert!(!config.is_failed(None));
    }

    #[test]
    fn test_token_is_redacted() {
        let config = GitHubConfig {
            token: "ghp_secret".to_string(),
        };
        assert!(!format!("{:?}", config).contains("ghp_secret"));
    }
}
