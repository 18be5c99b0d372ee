//! Configuration management for spyglass.
//!
//! Loads configuration from TOML files. The API credential is never part
//! of the file; it comes from the `GEMINI_API_KEY` environment variable
//! at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub playback: PlaybackConfig,
    pub assistant: AssistantConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./spyglass.toml`
    /// 2. `~/.config/spyglass/spyglass.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load("spyglass.toml") {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("spyglass").join("spyglass.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("spyglass.toml")
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path of the CSV dataset loaded at startup.
    pub data_path: PathBuf,
    /// Symbol the dataset describes, used in titles and log lines.
    pub symbol: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("TSLA_data.csv"),
            symbol: "TSLA".to_string(),
        }
    }
}

/// Animation playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between animation frames in milliseconds.
    pub frame_duration_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_duration_ms: 100,
        }
    }
}

/// Assistant (remote model) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Model identifier sent to the generateContent endpoint.
    pub model: String,
    /// Base URL override for the inference API.
    pub base_url: Option<String>,
    /// Minimum delay between remote calls in milliseconds.
    pub min_request_interval_ms: u64,
    /// Preset questions offered in the assistant view.
    pub example_questions: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            base_url: None,
            min_request_interval_ms: 1000,
            example_questions: vec![
                "What was the highest price in the dataset?".to_string(),
                "Show me the trading patterns for the last month".to_string(),
                "What were the most common support levels?".to_string(),
                "Analyze the volume trends".to_string(),
                "What was the average trading volume?".to_string(),
                "Show me the price trend over the last 30 days".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.symbol, "TSLA");
        assert_eq!(config.playback.frame_duration_ms, 100);
        assert_eq!(config.assistant.model, "gemini-1.5-flash");
        assert_eq!(config.assistant.min_request_interval_ms, 1000);
        assert_eq!(config.assistant.example_questions.len(), 6);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[general]
data_path = "data/spy.csv"
symbol = "SPY"

[playback]
frame_duration_ms = 50

[assistant]
model = "gemini-1.5-pro"
min_request_interval_ms = 2000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.general.symbol, "SPY");
        assert_eq!(config.general.data_path, PathBuf::from("data/spy.csv"));
        assert_eq!(config.playback.frame_duration_ms, 50);
        assert_eq!(config.assistant.model, "gemini-1.5-pro");
        assert_eq!(config.assistant.min_request_interval_ms, 2000);
        // Unset fields keep their defaults
        assert_eq!(config.assistant.example_questions.len(), 6);
        assert!(config.assistant.base_url.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.general.symbol, config.general.symbol);
        assert_eq!(
            parsed.playback.frame_duration_ms,
            config.playback.frame_duration_ms
        );
    }
}
