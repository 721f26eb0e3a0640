// Configuration management for the adrail CLI
//
// Cross-platform config stored in:
// - macOS: ~/.config/adrail/config.json
// - Linux: ~/.config/adrail/config.json
// - Windows: %APPDATA%\adrail\config.json

use adrail_core::{AdConfig, BannerPlacement};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ad session configuration passed to the coordinator
    pub ads: AdConfig,

    /// Demo pacing and scripting
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Pause between scripted events in milliseconds
    pub step_millis: u64,

    /// Number of interstitial present/dismiss cycles to run
    pub presentations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ads: AdConfig {
                use_test_inventory: true,
                ..AdConfig::default()
            },
            demo: DemoConfig::default(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            step_millis: 250,
            presentations: 2,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("adrail");

        // Create directory if it doesn't exist
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load config from a specific file, or create default if not exists
    pub fn load_from(config_file: &Path) -> Result<Self> {
        if config_file.exists() {
            let contents =
                std::fs::read_to_string(config_file).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            // Create default config
            let config = Config::default();
            config.save_to(config_file)?;
            Ok(config)
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    /// Save config to a specific file
    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_file, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Set a config value. The caller persists with `save`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "application_id" => {
                self.ads.application_id = value.to_string();
            }
            "banner_slot" => {
                self.ads.banner_slot = value.to_string();
            }
            "interstitial_slot" => {
                self.ads.interstitial_slot = value.to_string();
            }
            "placement" => {
                self.ads.placement = parse_placement(value)?;
            }
            "use_test_inventory" => {
                self.ads.use_test_inventory = value.parse().context("Invalid boolean value")?;
            }
            "step_millis" => {
                self.demo.step_millis = value.parse().context("Invalid number")?;
            }
            "presentations" => {
                self.demo.presentations = value.parse().context("Invalid number")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "application_id" => Some(self.ads.application_id.clone()),
            "banner_slot" => Some(self.ads.banner_slot.clone()),
            "interstitial_slot" => Some(self.ads.interstitial_slot.clone()),
            "placement" => Some(self.ads.placement.to_string()),
            "use_test_inventory" => Some(self.ads.use_test_inventory.to_string()),
            "step_millis" => Some(self.demo.step_millis.to_string()),
            "presentations" => Some(self.demo.presentations.to_string()),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "application_id".to_string(),
                self.ads.application_id.clone(),
            ),
            ("banner_slot".to_string(), self.ads.banner_slot.clone()),
            (
                "interstitial_slot".to_string(),
                self.ads.interstitial_slot.clone(),
            ),
            ("placement".to_string(), self.ads.placement.to_string()),
            (
                "use_test_inventory".to_string(),
                self.ads.use_test_inventory.to_string(),
            ),
            (
                "step_millis".to_string(),
                format!("{}ms", self.demo.step_millis),
            ),
            (
                "presentations".to_string(),
                self.demo.presentations.to_string(),
            ),
        ]
    }
}

fn parse_placement(value: &str) -> Result<BannerPlacement> {
    match value.to_ascii_lowercase().as_str() {
        "top" => Ok(BannerPlacement::Top),
        "bottom" => Ok(BannerPlacement::Bottom),
        _ => anyhow::bail!("Invalid placement (expected 'top' or 'bottom'): {}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ads.use_test_inventory);
        assert_eq!(config.demo.presentations, 2);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.demo.step_millis, deserialized.demo.step_millis);
        assert_eq!(config.ads.banner_slot, deserialized.ads.banner_slot);
    }

    #[test]
    fn test_parse_placement() {
        assert_eq!(parse_placement("top").unwrap(), BannerPlacement::Top);
        assert_eq!(parse_placement("Bottom").unwrap(), BannerPlacement::Bottom);
        assert!(parse_placement("left").is_err());
    }

    #[test]
    fn test_set_get_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.json");

        let mut config = Config::load_from(&file).unwrap();
        config.set("placement", "top").unwrap();
        config.set("presentations", "5").unwrap();
        config.set("banner_slot", "b-99").unwrap();
        config.save_to(&file).unwrap();

        let reloaded = Config::load_from(&file).unwrap();
        assert_eq!(reloaded.get("placement").as_deref(), Some("Top"));
        assert_eq!(reloaded.get("presentations").as_deref(), Some("5"));
        assert_eq!(reloaded.get("banner_slot").as_deref(), Some("b-99"));

        let listed = reloaded.list();
        assert!(listed.iter().any(|(k, v)| k == "placement" && v == "Top"));
        assert!(listed.iter().any(|(k, v)| k == "banner_slot" && v == "b-99"));
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_value() {
        let mut config = Config::default();
        assert!(config.set("no_such_key", "1").is_err());
        assert!(config.set("use_test_inventory", "maybe").is_err());
        assert!(config.set("placement", "left").is_err());
    }
}
