//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the login endpoint address and the last used username.
//!
//! Configuration is stored at `~/.config/clinicport/config.json`. The
//! `CLINICPORT_API_URL` environment variable overrides the stored
//! endpoint address.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "clinicport";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Endpoint used when nothing is configured (local development backend)
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the endpoint address
const API_URL_ENV: &str = "CLINICPORT_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Endpoint address: environment override, then config, then default
    pub fn api_url(&self) -> String {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the durable session slots
    pub fn session_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
