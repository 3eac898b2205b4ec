use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "STORY_TRACKER_TOKEN";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub tracker: Option<TrackerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub api_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl AppConfig {
    /// The environment token wins over the stored one.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.tracker.as_ref().map(|t| t.api_token.clone()))
    }

    pub fn api_base(&self) -> Option<String> {
        self.tracker.as_ref().and_then(|t| t.api_base.clone())
    }
}

/// Tracker project bound to a repository directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMapping {
    pub project_id: u64,
    pub project_name: String,
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".story")
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

fn mappings_path() -> PathBuf {
    data_dir().join("projects.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_toml(&config_path(), config)
}

pub fn load_project_mappings() -> Result<HashMap<String, ProjectMapping>> {
    load_mappings_from(&mappings_path())
}

pub fn save_project_mapping(project_dir: &str, mapping: &ProjectMapping) -> Result<()> {
    let path = mappings_path();
    let mut mappings = load_mappings_from(&path)?;
    mappings.insert(project_dir.to_string(), mapping.clone());
    save_toml(&path, &mappings)
}

/// Canonical path of the working directory, used as the mapping key.
pub fn current_project_dir() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.canonicalize().ok())
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

fn load_mappings_from(path: &Path) -> Result<HashMap<String, ProjectMapping>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn save_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(value)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
