use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Repository-local configuration file name
pub const REPO_CONFIG_FILE: &str = ".shepherd.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub verbose: bool,
    /// Answer yes to every confirmation prompt
    pub no_confirm: bool,
}

/// How the GitHub CLI is invoked
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Name or path of the gh executable
    pub binary: String,
    /// Maximum number of open issues fetched per listing
    pub issue_limit: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            binary: "gh".to_string(),
            // gh lists only 30 issues unless told otherwise
            issue_limit: 1000,
        }
    }
}

impl Config {
    /// Load configuration from the standard config paths
    pub fn load() -> Result<Self> {
        // Try loading in this order:
        // 1. .shepherd.yaml in current directory
        // 2. ~/.config/shepherd/config.yaml
        // 3. Default configuration
        let repo_config_path = PathBuf::from(REPO_CONFIG_FILE);
        if repo_config_path.exists() {
            return Self::load_from_path(&repo_config_path);
        }

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                return Self::load_from_path(&user_config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Get the user configuration path
    pub fn user_config_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("shepherd").join("config.yaml"))
        } else {
            dirs::home_dir()
                .map(|home_dir| home_dir.join(".config").join("shepherd").join("config.yaml"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.behavior.verbose);
        assert!(!config.behavior.no_confirm);
        assert_eq!(config.github.binary, "gh");
        assert_eq!(config.github.issue_limit, 1000);
    }

    #[test]
    fn test_config_loading_from_path() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("shepherd.yaml");

        let test_config = r#"
behavior:
  verbose: true
  no_confirm: true

github:
  binary: /opt/gh/bin/gh
  issue_limit: 200
"#;
        fs::write(&config_path, test_config).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert!(config.behavior.verbose);
        assert!(config.behavior.no_confirm);
        assert_eq!(config.github.binary, "/opt/gh/bin/gh");
        assert_eq!(config.github.issue_limit, 200);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("shepherd.yaml");
        fs::write(&config_path, "github:\n  issue_limit: 5\n").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.github.issue_limit, 5);
        assert_eq!(config.github.binary, "gh");
        assert_eq!(config.behavior, BehaviorConfig::default());
    }

    #[test]
    fn test_empty_config_file_is_default() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("shepherd.yaml");
        fs::write(&config_path, "\n").unwrap();

        assert_eq!(Config::load_from_path(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let err = Config::load_from_path(&temp_dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("shepherd.yaml");
        fs::write(&config_path, "github:\n  issue_limit: lots\n").unwrap();

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_user_config_path_ends_with_shepherd() {
        if let Some(path) = Config::user_config_path() {
            assert!(path.ends_with("shepherd/config.yaml"));
        }
    }
}
