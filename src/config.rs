use crate::domain::{GenerateVersionOptions, NextRelease};
use crate::error::{DescribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file looked up in the repository directory
pub const CONFIG_FILE_NAME: &str = ".git-describe-semver.toml";

/// Configuration file looked up in the user config directory
pub const USER_CONFIG_FILE_NAME: &str = "git-describe-semver.toml";

/// Version generation settings from a TOML file or the command line.
///
/// Every key is optional. Unset keys fall through to the next layer and
/// finally to the defaults of [GenerateVersionOptions].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub fallback: Option<String>,

    #[serde(default)]
    pub drop_prefix: Option<bool>,

    #[serde(default)]
    pub prerelease_prefix: Option<String>,

    #[serde(default)]
    pub prerelease_suffix: Option<String>,

    #[serde(default)]
    pub prerelease_timestamped: Option<bool>,

    #[serde(default)]
    pub next_release: Option<String>,

    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Layer `self` over `base`: keys set here win, unset keys come from `base`.
    pub fn overlay(self, base: Config) -> Config {
        Config {
            fallback: self.fallback.or(base.fallback),
            drop_prefix: self.drop_prefix.or(base.drop_prefix),
            prerelease_prefix: self.prerelease_prefix.or(base.prerelease_prefix),
            prerelease_suffix: self.prerelease_suffix.or(base.prerelease_suffix),
            prerelease_timestamped: self.prerelease_timestamped.or(base.prerelease_timestamped),
            next_release: self.next_release.or(base.next_release),
            format: self.format.or(base.format),
        }
    }

    /// Resolve into generation options, filling unset keys with defaults
    ///
    /// # Returns
    /// * `Ok(GenerateVersionOptions)` - Resolved options
    /// * `Err` - If `next_release` is not a known release level
    pub fn to_options(&self) -> Result<GenerateVersionOptions> {
        let defaults = GenerateVersionOptions::default();
        let next_release = match self.next_release.as_deref() {
            Some(level) => level.parse::<NextRelease>()?,
            None => defaults.next_release,
        };

        Ok(GenerateVersionOptions {
            fallback_tag_name: self.fallback.clone().unwrap_or(defaults.fallback_tag_name),
            drop_tag_name_prefix: self.drop_prefix.unwrap_or(defaults.drop_tag_name_prefix),
            prerelease_suffix: self
                .prerelease_suffix
                .clone()
                .unwrap_or(defaults.prerelease_suffix),
            prerelease_prefix: self
                .prerelease_prefix
                .clone()
                .unwrap_or(defaults.prerelease_prefix),
            prerelease_timestamped: self
                .prerelease_timestamped
                .unwrap_or(defaults.prerelease_timestamped),
            next_release,
            format: self.format.clone().unwrap_or(defaults.format),
        })
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.git-describe-semver.toml` in the repository directory
/// 3. `git-describe-semver.toml` in the user config directory
/// 4. Default (empty) configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `dir` - Repository directory searched for a project configuration
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, dir: &Path) -> Result<Config> {
    match find_config_file(config_path, dir) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn find_config_file(config_path: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let project = dir.join(CONFIG_FILE_NAME);
    if project.exists() {
        return Some(project);
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path)?;

    toml::from_str(&content).map_err(|e| {
        DescribeError::config(format!("cannot parse '{}': {}", path.display(), e))
    })
}
