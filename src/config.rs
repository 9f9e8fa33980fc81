//! Application settings, read from `flashcards.json` next to the binary's
//! working directory. Every field is optional; a missing file means defaults.

use crate::error::Result;
use crate::models::SchedulerConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "flashcards.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// Language used by the sentence generator.
    pub target_language: String,
    pub scheduler: SchedulerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("db.sqlite3"),
            target_language: "Spanish".to_string(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the config file, propagating I/O and parse errors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Like `from_path`, but a missing or unreadable file falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Err(crate::error::FlashcardsError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                warn!("Ignoring configuration in {:?}: {}", path, err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_selected_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "target_language": "French", "scheduler": { "learning_again_delay_seconds": 60 } }"#,
        )
        .unwrap();

        let config = AppConfig::load_or_default(&path);
        assert_eq!(config.target_language, "French");
        assert_eq!(config.scheduler.learning_again_delay_seconds, 60);
        assert_eq!(config.scheduler.good_bonus, 1.15);
        assert_eq!(config.database_path, PathBuf::from("db.sqlite3"));
    }

    #[test]
    fn test_malformed_file_falls_back() {
        crate::logging::initialize_for_tests();
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::from_path(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }
}
