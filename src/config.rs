use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::bible::DEFAULT_API_BASE_URL;
use crate::favorites::default_favorites_path;
use crate::render::WRAP_WIDTH;

const MIN_WRAP_WIDTH: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_width: Option<usize>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Falls back to defaults when the file is malformed. A missing file is
    /// created with the default values spelled out so they can be edited.
    pub fn load_or_default() -> Self {
        let path = match Self::get_config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "using default config");
                return Self::new();
            }
        };

        if !path.exists() {
            let config = Self::starter();
            match config.save_to(&path) {
                Ok(()) => info!(path = %path.display(), "wrote default config"),
                Err(e) => warn!(error = %e, "could not write default config"),
            }
            return config;
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!(error = %e, "using default config");
            Self::new()
        })
    }

    /// Defaults made explicit. The favorites path stays unset so it keeps
    /// following the home directory.
    pub fn starter() -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            favorites_path: None,
            wrap_width: Some(WRAP_WIDTH),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
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

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(default_favorites_path)
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width.unwrap_or(WRAP_WIDTH).max(MIN_WRAP_WIDTH)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("terminal-bible").join("config.json"))
    }
}
