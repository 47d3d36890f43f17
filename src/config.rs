use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::detect::DetectOptions;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub detect: DetectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Opening marker for emphasised (user-filled or still-needed) values
    #[serde(default = "default_emphasis_open")]
    pub emphasis_open: String,

    /// Closing marker for emphasised values
    #[serde(default = "default_emphasis_close")]
    pub emphasis_close: String,

    /// HTML-escape values before wrapping them in the emphasis markers
    /// (default: true). Turn off when the output is consumed as plain text.
    #[serde(default = "default_true")]
    pub escape_values: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            emphasis_open: default_emphasis_open(),
            emphasis_close: default_emphasis_close(),
            escape_values: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Minimum length for a detected placeholder name (default: 2)
    #[serde(default = "default_min_name_length")]
    pub min_name_length: usize,

    /// Extra words to ignore during detection, on top of the built-in
    /// HTML-tag/keyword list
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_name_length: default_min_name_length(),
            ignore: Vec::new(),
        }
    }
}

fn default_emphasis_open() -> String {
    "<b>".to_string()
}

fn default_emphasis_close() -> String {
    "</b>".to_string()
}

fn default_min_name_length() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from the working directory or the user config directory
    #[allow(dead_code)]
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try working directory first (per-project config)
        if let Ok(config) = Self::load_from_path("promptvars.toml") {
            debug!("Loaded config from ./promptvars.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("promptvars").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        // Return defaults
        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            emphasis_open: self.render.emphasis_open.clone(),
            emphasis_close: self.render.emphasis_close.clone(),
            escape_values: self.render.escape_values,
        }
    }

    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            min_name_length: self.detect.min_name_length,
            ignore: self.detect.ignore.clone(),
        }
    }
}
