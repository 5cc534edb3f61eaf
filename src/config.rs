//! Configuration loading and management
//!
//! Handles parsing of `.taskbot.toml` from the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the data directory
pub const CONFIG_FILENAME: &str = ".taskbot.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Task store document, relative to the data directory
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Local guild state (roles, members), relative to the data directory
    #[serde(default = "default_guild_file")]
    pub guild_file: PathBuf,

    /// Maximum characters in the admin overview reply
    #[serde(default = "default_showall_max_chars")]
    pub showall_max_chars: usize,

    /// Reward role configuration
    #[serde(default)]
    pub reward: RewardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            guild_file: default_guild_file(),
            showall_max_chars: default_showall_max_chars(),
            reward: RewardConfig::default(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("todos.json")
}

fn default_guild_file() -> PathBuf {
    PathBuf::from("guild.json")
}

fn default_showall_max_chars() -> usize {
    1900
}

/// Reward role granted once a user's points reach the threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_role_name")]
    pub role_name: String,

    #[serde(default = "default_threshold")]
    pub threshold: u64,
}

fn default_role_name() -> String {
    "Task Master".to_string()
}

fn default_threshold() -> u64 {
    10
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            role_name: default_role_name(),
            threshold: default_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskbot.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory.
    ///
    /// A missing file yields defaults; a file that exists but fails to parse
    /// or validate is an error.
    pub fn load_from_dir(data_dir: &Path) -> crate::error::Result<Self> {
        let config_path = data_dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Store document path resolved against `data_dir`
    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data_file)
    }

    /// Guild state path resolved against `data_dir`
    pub fn guild_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.guild_file)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.reward.role_name.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "reward.role_name cannot be empty".to_string(),
            ));
        }
        if self.reward.threshold == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "reward.threshold must be >= 1".to_string(),
            ));
        }
        if self.showall_max_chars == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "showall_max_chars must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
