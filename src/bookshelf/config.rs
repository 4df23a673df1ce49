use crate::error::{Result, ShelfError};
use crate::model::DEFAULT_LIBRARY_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const KEY_LIBRARY_NAME: &str = "library-name";
pub const KEY_SEED_SAMPLES: &str = "seed-samples";
pub const KEYS: [&str; 2] = [KEY_LIBRARY_NAME, KEY_SEED_SAMPLES];

/// Configuration for bookshelf, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ShelfConfig {
    /// Shown as the table heading
    #[serde(default = "default_library_name")]
    pub library_name: String,

    /// Whether an empty library starts with the sample books
    #[serde(default = "default_seed_samples")]
    pub seed_samples: bool,
}

fn default_library_name() -> String {
    DEFAULT_LIBRARY_NAME.to_string()
}

fn default_seed_samples() -> bool {
    true
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            library_name: default_library_name(),
            seed_samples: default_seed_samples(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

impl ConfigAction {
    pub fn from_args(key: Option<String>, value: Option<String>) -> Self {
        match (key, value) {
            (None, _) => ConfigAction::ShowAll,
            (Some(key), None) => ConfigAction::ShowKey(key),
            (Some(key), Some(value)) => ConfigAction::Set(key, value),
        }
    }
}

impl ShelfConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ShelfConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            KEY_LIBRARY_NAME => Some(self.library_name.clone()),
            KEY_SEED_SAMPLES => Some(self.seed_samples.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_LIBRARY_NAME => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(ShelfError::Config(
                        "library-name must not be empty".to_string(),
                    ));
                }
                self.library_name = name.to_string();
            }
            KEY_SEED_SAMPLES => {
                self.seed_samples = parse_bool(value).ok_or_else(|| {
                    ShelfError::Config(format!(
                        "seed-samples expects true or false, got \"{}\"",
                        value
                    ))
                })?;
            }
            _ => return Err(ShelfError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    /// All keys with their current values, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShelfConfig::default();
        assert_eq!(config.library_name, "My Library");
        assert!(config.seed_samples);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShelfConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShelfConfig::default();
        config.set("library-name", "  Attic Shelf ").unwrap();
        config.set("seed-samples", "no").unwrap();
        config.save(dir.path().join("data")).unwrap();

        let loaded = ShelfConfig::load(dir.path().join("data")).unwrap();
        assert_eq!(loaded.library_name, "Attic Shelf");
        assert!(!loaded.seed_samples);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"seed-samples": false}"#).unwrap();

        let config = ShelfConfig::load(dir.path()).unwrap();
        assert_eq!(config.library_name, "My Library");
        assert!(!config.seed_samples);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ShelfConfig::default();
        assert!(matches!(
            config.set("seed-samples", "maybe"),
            Err(ShelfError::Config(_))
        ));
        assert!(config.set("library-name", "   ").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_get_unknown_key() {
        assert_eq!(ShelfConfig::default().get("colour"), None);
        assert_eq!(
            ShelfConfig::default().get("seed-samples").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_action_from_args() {
        assert!(matches!(ConfigAction::from_args(None, None), ConfigAction::ShowAll));
        assert!(matches!(
            ConfigAction::from_args(Some("k".into()), None),
            ConfigAction::ShowKey(k) if k == "k"
        ));
        assert!(matches!(
            ConfigAction::from_args(Some("k".into()), Some("v".into())),
            ConfigAction::Set(k, v) if k == "k" && v == "v"
        ));
    }
}
