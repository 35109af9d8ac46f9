//! Configuration handling for techtree
//!
//! Configuration is read from `techtree.toml` (project, found by walking up
//! from the current directory) and `~/.config/techtree/config.toml`
//! (global). An explicit `--config` path replaces the project file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{LaneStyle, LayoutMetrics};
use crate::view::{CycleSource, RenderOptions};

/// File name of the project configuration
pub const PROJECT_CONFIG_FILE: &str = "techtree.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Layout configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Which cycle list to show
    pub cycles: CycleSource,

    /// Pixel metrics
    pub layout: LayoutMetrics,

    /// Lane names and colors
    pub lanes: LaneStyle,
}

impl Config {
    /// Loads configuration from default locations
    ///
    /// The project file (or `explicit`, when given) replaces the global
    /// file; fields missing from the chosen file take built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        if let Some(root) = Self::find_project_root() {
            return Self::load_file(&root.join(PROJECT_CONFIG_FILE));
        }

        match Self::global_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads and validates one configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.node_width == 0 || self.layout.node_height == 0 {
            return Err(ConfigError::Invalid(
                "layout.node_width and layout.node_height must be positive".to_string(),
            ));
        }
        if let Some((name, value)) = self
            .layout
            .entries()
            .into_iter()
            .find(|&(_, value)| value > LayoutMetrics::MAX_VALUE)
        {
            return Err(ConfigError::Invalid(format!(
                "layout.{} = {} exceeds the maximum of {}",
                name,
                value,
                LayoutMetrics::MAX_VALUE
            )));
        }
        if self.lanes.unassigned_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "lanes.unassigned_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "techtree", "techtree")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Finds the nearest directory holding `techtree.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Builds render options from this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            metrics: self.layout,
            lane_style: self.lanes.clone(),
            cycle_source: self.cycles,
        }
    }

    /// Serializes the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
