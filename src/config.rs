use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000";
pub const ENDPOINT_ENV_VAR: &str = "CHAT_WIDGET_ENDPOINT";

/// Model keys understood by the chat backend
pub const DEFAULT_MODELS: [&str; 2] = ["openai_gpt-3.5-turbo", "anthropic_claude-3-haiku"];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint_url: Option<String>,
    pub default_model: Option<String>,
    pub models: Option<Vec<String>>,
    pub system_prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_default_model(model: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.default_model = Some(model.to_string());
        config.save()
    }

    /// Let `CHAT_WIDGET_ENDPOINT` override the configured endpoint
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENDPOINT_ENV_VAR) {
            if !url.trim().is_empty() {
                self.endpoint_url = Some(url.trim().to_string());
            }
        }
    }

    pub fn endpoint_url(&self) -> &str {
        self.endpoint_url.as_deref().unwrap_or(DEFAULT_ENDPOINT_URL)
    }

    /// Options offered by the model selector, never empty
    pub fn models(&self) -> Vec<String> {
        match &self.models {
            Some(models) if !models.is_empty() => models.clone(),
            _ => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Model selected at startup: the saved default, else the first option
    pub fn initial_model(&self) -> String {
        let models = self.models();
        self.default_model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| models[0].clone())
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chat-widget"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.json"))
    }
}
