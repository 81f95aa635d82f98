//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.tvmaze.com";

/// How HTML markup inside summaries takes part in search matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MarkupPolicy {
    /// Tags are matched as literal text
    #[default]
    Literal,
    /// Tags are removed before matching
    Stripped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_preview_len")]
    pub summary_preview_len: usize,
    #[serde(default)]
    pub summary_search: MarkupPolicy,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_api_url() -> String { DEFAULT_API_URL.to_string() }
fn default_connect_timeout() -> u64 { 10 }
fn default_read_timeout() -> u64 { 30 }
fn default_preview_len() -> usize { 200 }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            user_agent: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            summary_preview_len: default_preview_len(),
            summary_search: MarkupPolicy::Literal,
            dark_mode: true,
        }
    }
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("tv_catalog");
        path.push("config.json");
        path
    }

    pub fn load() -> Self {
        let path = Self::config_path();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => return Self::from_json(&content),
                Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    /// Parse a config file body, falling back to defaults when it is corrupt
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config file: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok();
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    log::error!("Failed to save config to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::error!("Failed to serialize config: {}", e),
        }
    }
}
