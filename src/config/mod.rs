//! Configuration management for landing-autopilot.
//!
//! Configuration is read from `--config FILE` or from
//! `~/.config/landing-autopilot/config.toml`. If the default file doesn't
//! exist, a default configuration with comments is created. Command-line
//! flags override values from the file.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub rewrite: RewriteConfig,
    pub deploy: DeployConfig,
}

/// Settings for fetching the reference page and its images.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum number of images to download (default: 8)
    pub max_images: usize,

    /// Request timeout in seconds (default: 20)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_images: 8,
            timeout_secs: 20,
            user_agent: "landing-autopilot-scraper/2.0 (+https://github.com)".to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the language-model copy rewrite.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub endpoint: String,
    pub model: String,
    pub reasoning_effort: String,
    pub timeout_secs: u64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/responses".to_string(),
            model: "gpt-5".to_string(),
            reasoning_effort: "low".to_string(),
            timeout_secs: 300,
        }
    }
}

/// Settings for publishing the project tree to GitHub.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub api_base: String,
    pub branch: String,
    pub commit_message: String,
    pub user_agent: String,
    /// Relative paths never uploaded. Entries ending in `/` match directories.
    pub ignore: Vec<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            branch: "main".to_string(),
            commit_message: "chore: update landing autopilot workflow".to_string(),
            user_agent: "landing-autopilot-workflow".to_string(),
            ignore: vec![
                "target/".to_string(),
                "dist/".to_string(),
                ".git/".to_string(),
                "node_modules/".to_string(),
                "workspace/".to_string(),
                ".env".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or from the default path.
    ///
    /// An explicit file must exist. A missing default file is created with
    /// comments. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/landing-autopilot/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("landing-autopilot").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# landing-autopilot configuration
#
# Secrets are never read from this file. Pass them with --api-key / --token
# or the OPENAI_API_KEY / GITHUB_TOKEN environment variables.

[scraper]
# Maximum number of images downloaded from the reference page
max_images = 8

# Request timeout in seconds
timeout_secs = 20

user_agent = "landing-autopilot-scraper/2.0 (+https://github.com)"

[rewrite]
endpoint = "https://api.openai.com/v1/responses"
model = "gpt-5"
reasoning_effort = "low"
timeout_secs = 300

[deploy]
api_base = "https://api.github.com"
branch = "main"
commit_message = "chore: update landing autopilot workflow"
user_agent = "landing-autopilot-workflow"

# Paths that are never uploaded (a trailing "/" matches a directory)
ignore = ["target/", "dist/", ".git/", "node_modules/", "workspace/", ".env"]
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
